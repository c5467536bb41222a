/// Sample rate every signal is normalized to before inference.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Mono PCM at [`TARGET_SAMPLE_RATE`].
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f32>,
}

impl AudioSignal {
    pub fn from_mono_16khz(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn empty() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        TARGET_SAMPLE_RATE
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / TARGET_SAMPLE_RATE as f32
    }

    /// Root-mean-square energy; zero for an empty signal.
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (sum_sq / self.samples.len() as f64).sqrt() as f32
    }

    /// No samples, or energy below `rms_threshold`; nothing worth decoding.
    pub fn is_silent(&self, rms_threshold: f32) -> bool {
        self.samples.is_empty() || self.rms() < rms_threshold
    }
}

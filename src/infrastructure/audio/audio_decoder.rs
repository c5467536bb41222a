use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioNormalizer, DecodeError};
use crate::domain::{AudioSignal, RawMediaBytes, TARGET_SAMPLE_RATE};

const RESAMPLE_CHUNK_SIZE: usize = 1024;

/// Pure-Rust decoder: symphonia for containers/codecs, rubato for resampling.
pub struct SymphoniaAudioNormalizer;

impl AudioNormalizer for SymphoniaAudioNormalizer {
    fn normalize(&self, media: &RawMediaBytes) -> Result<AudioSignal, DecodeError> {
        if media.is_empty() {
            return Ok(AudioSignal::empty());
        }

        let mut hint = Hint::new();
        if let Some(ext) = media.extension_hint() {
            hint.with_extension(ext);
        }

        let samples = decode_audio_to_pcm(media.data(), &hint)?;
        Ok(AudioSignal::from_mono_16khz(samples))
    }
}

/// Decodes any container symphonia can probe into 16 kHz mono PCM.
///
/// symphonia asserts on some malformed headers (a zero sample rate, for one);
/// those panics come back as [`DecodeError::DecodingFailed`].
pub fn decode_audio_to_pcm(data: &[u8], hint: &Hint) -> Result<Vec<f32>, DecodeError> {
    panic::catch_unwind(AssertUnwindSafe(|| decode_and_downmix(data, hint))).unwrap_or_else(|_| {
        Err(DecodeError::DecodingFailed("decoder panicked on malformed input".to_string()))
    })
}

fn decode_and_downmix(data: &[u8], hint: &Hint) -> Result<Vec<f32>, DecodeError> {
    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::UnsupportedFormat(format!("probe: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::DecodingFailed("no audio track found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let source_rate = codec_params
        .sample_rate
        .filter(|&rate| rate > 0)
        .ok_or_else(|| DecodeError::DecodingFailed("unknown sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnsupportedFormat(format!("codec: {}", e)))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(DecodeError::DecodingFailed(format!("packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => {
                return Err(DecodeError::DecodingFailed(format!("decode: {}", e)));
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        if num_frames == 0 {
            continue;
        }
        let channels = spec.channels.count().max(1);

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let samples = sample_buf.samples();

        if channels > 1 {
            for frame in samples.chunks(channels) {
                let mono: f32 = frame.iter().sum::<f32>() / channels as f32;
                all_samples.push(mono);
            }
        } else {
            all_samples.extend_from_slice(samples);
        }
    }

    if all_samples.is_empty() {
        tracing::debug!("Audio container holds no samples");
        return Ok(all_samples);
    }

    if source_rate != TARGET_SAMPLE_RATE {
        all_samples = resample(&all_samples, source_rate, TARGET_SAMPLE_RATE)?;
    }

    tracing::debug!(
        source_rate = source_rate,
        samples = all_samples.len(),
        duration_secs = all_samples.len() as f32 / TARGET_SAMPLE_RATE as f32,
        "Audio decoded to 16kHz mono PCM"
    );

    Ok(all_samples)
}

pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, DecodeError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, RESAMPLE_CHUNK_SIZE, 1)
        .map_err(|e| DecodeError::ResamplingFailed(format!("init: {}", e)))?;

    let expected_len = (samples.len() as f64 * ratio) as usize;
    let mut output = Vec::with_capacity(expected_len + RESAMPLE_CHUNK_SIZE);

    // One extra silent chunk flushes the sinc filter's delay line.
    let flush = vec![0.0f32; RESAMPLE_CHUNK_SIZE];
    let chunks = samples
        .chunks(RESAMPLE_CHUNK_SIZE)
        .chain(std::iter::once(flush.as_slice()));

    for chunk in chunks {
        let mut input = chunk.to_vec();
        input.resize(RESAMPLE_CHUNK_SIZE, 0.0);

        let result = resampler
            .process(&[input], None)
            .map_err(|e| DecodeError::ResamplingFailed(e.to_string()))?;

        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    let delay = resampler.output_delay();
    let end = (delay + expected_len).min(output.len());
    let start = delay.min(end);

    Ok(output[start..end].to_vec())
}

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::application::ports::{AudioNormalizer, DecodeError};
use crate::domain::{AudioSignal, RawMediaBytes, TARGET_SAMPLE_RATE};

/// Decodes through an external `ffmpeg` binary. Covers codecs symphonia does
/// not ship, Opus voice notes in particular.
pub struct FfmpegAudioNormalizer {
    binary: PathBuf,
}

impl FfmpegAudioNormalizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegAudioNormalizer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl AudioNormalizer for FfmpegAudioNormalizer {
    fn normalize(&self, media: &RawMediaBytes) -> Result<AudioSignal, DecodeError> {
        if media.is_empty() {
            return Ok(AudioSignal::empty());
        }

        let sample_rate = TARGET_SAMPLE_RATE.to_string();
        let mut child = Command::new(&self.binary)
            .args(["-hide_banner", "-loglevel", "error", "-i", "pipe:0", "-vn"])
            .args(["-f", "f32le", "-acodec", "pcm_f32le", "-ac", "1", "-ar"])
            .arg(&sample_rate)
            .arg("pipe:1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DecodeError::DecodingFailed(format!("spawn ffmpeg: {}", e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| DecodeError::DecodingFailed("ffmpeg stdin unavailable".to_string()))?;

        // Feed stdin from its own thread so a full stdout pipe cannot deadlock us.
        let input = media.data().to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&input));

        let output = child
            .wait_with_output()
            .map_err(|e| DecodeError::DecodingFailed(format!("wait ffmpeg: {}", e)))?;

        let write_result = writer
            .join()
            .map_err(|_| DecodeError::DecodingFailed("ffmpeg stdin writer panicked".to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DecodeError::DecodingFailed(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if let Err(e) = write_result {
            if e.kind() != ErrorKind::BrokenPipe {
                return Err(DecodeError::DecodingFailed(format!("ffmpeg stdin: {}", e)));
            }
        }

        let samples: Vec<f32> = output
            .stdout
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        tracing::debug!(
            samples = samples.len(),
            duration_secs = samples.len() as f32 / TARGET_SAMPLE_RATE as f32,
            "Audio decoded via ffmpeg"
        );

        Ok(AudioSignal::from_mono_16khz(samples))
    }
}

pub fn check_ffmpeg_binary(binary: &Path) -> Result<(), DecodeError> {
    let output = Command::new(binary)
        .arg("-version")
        .output()
        .map_err(|e| {
            DecodeError::UnsupportedFormat(format!("ffmpeg not found at {:?}: {}", binary, e))
        })?;

    if !output.status.success() {
        return Err(DecodeError::UnsupportedFormat(format!(
            "ffmpeg at {:?} exited with {}",
            binary, output.status
        )));
    }

    Ok(())
}

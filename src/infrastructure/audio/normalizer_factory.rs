use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{AudioNormalizer, DecodeError};

use super::audio_decoder::SymphoniaAudioNormalizer;
use super::ffmpeg_decoder::{FfmpegAudioNormalizer, check_ffmpeg_binary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioDecoderProvider {
    Symphonia,
    Ffmpeg,
}

pub struct AudioNormalizerFactory;

impl AudioNormalizerFactory {
    pub fn create(
        provider: AudioDecoderProvider,
        ffmpeg_path: &Path,
    ) -> Result<Arc<dyn AudioNormalizer>, DecodeError> {
        match provider {
            AudioDecoderProvider::Symphonia => Ok(Arc::new(SymphoniaAudioNormalizer)),
            AudioDecoderProvider::Ffmpeg => {
                check_ffmpeg_binary(ffmpeg_path)?;
                Ok(Arc::new(FfmpegAudioNormalizer::new(ffmpeg_path.to_path_buf())))
            }
        }
    }
}

use crate::domain::{AudioSignal, RawMediaBytes};

/// Turns an arbitrary audio payload into a 16 kHz mono signal.
///
/// Implementations are CPU-bound and synchronous; callers run them on the
/// blocking pool.
pub trait AudioNormalizer: Send + Sync {
    fn normalize(&self, media: &RawMediaBytes) -> Result<AudioSignal, DecodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("resampling failed: {0}")]
    ResamplingFailed(String),
}

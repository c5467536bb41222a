use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{AudioSignal, Transcript};

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, signal: &AudioSignal) -> Result<Transcript, TranscriptionError>;

    /// Identifier of the loaded model, for health output and logs.
    fn model_id(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("no speech in audio")]
    EmptyAudio,
    #[error("inference timed out after {0:?}")]
    Timeout(Duration),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
}

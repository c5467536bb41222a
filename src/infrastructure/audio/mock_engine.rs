use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{AudioSignal, Transcript};

#[derive(Debug, Clone)]
pub enum MockBehavior {
    Reply(String),
    /// Replies with `"{n} samples"`, so each input yields its own text.
    EchoSampleCount,
    Fail(String),
    Timeout,
    Panic,
    Sleep(Duration, String),
}

/// Deterministic engine for wiring and pipeline tests.
///
/// Applies the same [`AudioSignal::is_silent`] gate as the real engine, so
/// empty or near-zero audio is reported as [`TranscriptionError::EmptyAudio`] before `behavior` applies.
pub struct MockTranscriptionEngine {
    behavior: MockBehavior,
    calls: AtomicUsize,
    silence_rms_threshold: f32,
}

impl MockTranscriptionEngine {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            silence_rms_threshold: 1e-4,
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(text.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe(&self, audio: &AudioSignal) -> Result<Transcript, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if audio.is_silent(self.silence_rms_threshold) {
            return Err(TranscriptionError::EmptyAudio);
        }

        match &self.behavior {
            MockBehavior::Reply(text) => Ok(Transcript::complete(text.clone())),
            MockBehavior::EchoSampleCount => {
                Ok(Transcript::complete(format!("{} samples", audio.len())))
            }
            MockBehavior::Fail(reason) => Err(TranscriptionError::InferenceFailed(reason.clone())),
            MockBehavior::Timeout => Err(TranscriptionError::Timeout(Duration::from_secs(0))),
            MockBehavior::Panic => panic!("mock engine panicked"),
            MockBehavior::Sleep(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(Transcript::complete(text.clone()))
            }
        }
    }

    fn model_id(&self) -> &str {
        "mock-whisper"
    }
}

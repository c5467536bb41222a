use std::fmt;

use super::pipeline_stage::PipelineStage;

pub const DOWNLOAD_FAILED_MESSAGE: &str =
    "Sorry, your audio could not be downloaded. Please try again later.";
pub const DECODE_FAILED_MESSAGE: &str =
    "Sorry, your audio could not be decoded. Please send a different file.";
pub const TRANSCRIBE_FAILED_MESSAGE: &str =
    "Sorry, your audio could not be transcribed. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NetworkError,
    MediaUnavailable,
    MediaTooLarge,
    StagingFailed,
    DecodeError,
    InferenceTimeout,
    InferenceError,
    EmptyAudio,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NetworkError => "NETWORK_ERROR",
            FailureKind::MediaUnavailable => "MEDIA_UNAVAILABLE",
            FailureKind::MediaTooLarge => "MEDIA_TOO_LARGE",
            FailureKind::StagingFailed => "STAGING_FAILED",
            FailureKind::DecodeError => "DECODE_ERROR",
            FailureKind::InferenceTimeout => "INFERENCE_TIMEOUT",
            FailureKind::InferenceError => "INFERENCE_ERROR",
            FailureKind::EmptyAudio => "EMPTY_AUDIO",
        }
    }

    pub fn stage(&self) -> PipelineStage {
        match self {
            FailureKind::NetworkError
            | FailureKind::MediaUnavailable
            | FailureKind::MediaTooLarge
            | FailureKind::StagingFailed => PipelineStage::Fetching,
            FailureKind::DecodeError => PipelineStage::Normalizing,
            FailureKind::InferenceTimeout
            | FailureKind::InferenceError
            | FailureKind::EmptyAudio => PipelineStage::Transcribing,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self.stage() {
            PipelineStage::Fetching => DOWNLOAD_FAILED_MESSAGE,
            PipelineStage::Normalizing => DECODE_FAILED_MESSAGE,
            _ => TRANSCRIBE_FAILED_MESSAGE,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

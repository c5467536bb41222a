use super::failure_kind::FailureKind;
use super::pipeline_stage::PipelineStage;
use super::transcript::Transcript;

/// Terminal outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    Success(Transcript),
    Failure {
        stage: PipelineStage,
        kind: FailureKind,
        user_message: String,
    },
}

impl PipelineResult {
    pub fn failure(kind: FailureKind) -> Self {
        PipelineResult::Failure {
            stage: kind.stage(),
            kind,
            user_message: kind.user_message().to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success(_))
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            PipelineResult::Success(_) => None,
            PipelineResult::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Text to hand back to the sender.
    pub fn reply_text(&self) -> String {
        match self {
            PipelineResult::Success(transcript) => format!("Transcription: {}", transcript.text),
            PipelineResult::Failure { user_message, .. } => user_message.clone(),
        }
    }
}

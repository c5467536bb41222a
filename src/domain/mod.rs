mod audio_signal;
mod failure_kind;
mod media_reference;
mod pipeline_result;
mod pipeline_stage;
mod raw_media;
mod run_id;
mod storage_path;
mod transcript;

pub use audio_signal::{AudioSignal, TARGET_SAMPLE_RATE};
pub use failure_kind::{
    DECODE_FAILED_MESSAGE, DOWNLOAD_FAILED_MESSAGE, FailureKind, TRANSCRIBE_FAILED_MESSAGE,
};
pub use media_reference::{MediaCredentials, MediaReference};
pub use pipeline_result::PipelineResult;
pub use pipeline_stage::PipelineStage;
pub use raw_media::RawMediaBytes;
pub use run_id::RunId;
pub use storage_path::StoragePath;
pub use transcript::{Transcript, TranscriptOutcome};

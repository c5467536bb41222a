mod transcription_pipeline;

pub use transcription_pipeline::{PipelineOptions, TranscriptionPipeline};

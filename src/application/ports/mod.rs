mod audio_normalizer;
mod media_fetcher;
mod staging_store;
mod transcription_engine;

pub use audio_normalizer::{AudioNormalizer, DecodeError};
pub use media_fetcher::{FetchError, MediaFetcher};
pub use staging_store::{StagingStore, StagingStoreError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};

pub mod audio_decoder;
mod candle_whisper_engine;
pub mod ffmpeg_decoder;
mod inference_slot;
mod mock_engine;
mod normalizer_factory;

pub use audio_decoder::SymphoniaAudioNormalizer;
pub use candle_whisper_engine::{
    CandleWhisperEngine, DevicePreference, PromptTokens, WhisperOptions,
};
pub use ffmpeg_decoder::{FfmpegAudioNormalizer, check_ffmpeg_binary};
pub use inference_slot::{CancelFlag, InferenceSlot, run_blocking_with_timeout};
pub use mock_engine::{MockBehavior, MockTranscriptionEngine};
pub use normalizer_factory::{AudioDecoderProvider, AudioNormalizerFactory};

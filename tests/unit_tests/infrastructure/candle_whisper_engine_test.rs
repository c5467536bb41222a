use std::collections::HashMap;

use candle_core::{DType, Device};

use murmur::application::ports::TranscriptionError;
use murmur::infrastructure::audio::{
    CandleWhisperEngine, DevicePreference, PromptTokens, WhisperOptions,
};

const SOT: u32 = 50258;
const EN: u32 = 50259;
const DE: u32 = 50261;
const TRANSCRIBE: u32 = 50359;
const NO_TIMESTAMPS: u32 = 50363;

fn vocabulary(multilingual: bool) -> HashMap<String, u32> {
    let mut vocab = HashMap::from([
        ("<|startoftranscript|>".to_string(), SOT),
        ("<|transcribe|>".to_string(), TRANSCRIBE),
        ("<|notimestamps|>".to_string(), NO_TIMESTAMPS),
    ]);
    if multilingual {
        vocab.insert("<|en|>".to_string(), EN);
        vocab.insert("<|de|>".to_string(), DE);
    }
    vocab
}

#[test]
fn given_cpu_device_when_selecting_dtype_then_returns_f32() {
    assert_eq!(CandleWhisperEngine::select_dtype(&Device::Cpu), DType::F32);
}

#[test]
fn given_default_options_when_inspected_then_use_base_model_on_cpu() {
    let options = WhisperOptions::default();

    assert_eq!(options.model_id, "openai/whisper-base");
    assert_eq!(options.device, DevicePreference::Cpu);
    assert!(options.language.is_none());
    assert!(options.max_tokens_per_window > 0);
}

#[test]
fn given_configured_language_when_resolving_prompt_then_language_follows_start_token() {
    let vocab = vocabulary(true);

    let prompt = PromptTokens::resolve(|t| vocab.get(t).copied(), Some("de")).unwrap();

    assert!(!prompt.detects_language());
    assert_eq!(
        prompt.for_language(prompt.language),
        vec![SOT, DE, TRANSCRIBE, NO_TIMESTAMPS]
    );
}

#[test]
fn given_no_language_on_multilingual_vocab_when_resolving_then_detection_is_enabled() {
    let vocab = vocabulary(true);

    let prompt = PromptTokens::resolve(|t| vocab.get(t).copied(), None).unwrap();

    assert!(prompt.detects_language());
    assert_eq!(prompt.language_candidates(), &[EN, DE]);
    assert_eq!(
        prompt.for_language(Some(EN)),
        vec![SOT, EN, TRANSCRIBE, NO_TIMESTAMPS]
    );
}

#[test]
fn given_english_only_vocab_when_resolving_without_language_then_prompt_has_no_language() {
    let vocab = vocabulary(false);

    let prompt = PromptTokens::resolve(|t| vocab.get(t).copied(), None).unwrap();

    assert!(!prompt.detects_language());
    assert_eq!(prompt.for_language(None), vec![SOT, TRANSCRIBE, NO_TIMESTAMPS]);
}

#[test]
fn given_unknown_language_when_resolving_prompt_then_fails_to_load() {
    let vocab = vocabulary(true);

    let result = PromptTokens::resolve(|t| vocab.get(t).copied(), Some("xx"));

    assert!(matches!(result, Err(TranscriptionError::ModelLoadFailed(_))));
}

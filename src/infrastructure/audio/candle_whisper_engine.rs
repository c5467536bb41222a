use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use candle_core::{D, DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use super::inference_slot::{CancelFlag, InferenceSlot, run_blocking_with_timeout};
use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{AudioSignal, Transcript, TranscriptOutcome};

/// Language codes a multilingual Whisper vocabulary carries as `<|xx|>`.
const LANGUAGE_CODES: &[&str] = &[
    "en", "zh", "de", "es", "ru", "ko", "fr", "ja", "pt", "tr", "pl", "ca", "nl", "ar", "sv",
    "it", "id", "hi", "fi", "vi", "he", "uk", "el", "ms", "cs", "ro", "da", "hu", "ta", "no",
    "th", "ur", "hr", "bg", "lt", "la", "mi", "ml", "cy", "sk", "te", "fa", "lv", "bn", "sr",
    "az", "sl", "kn", "et", "mk", "br", "eu", "is", "hy", "ne", "mn", "bs", "kk", "sq", "sw",
    "gl", "mr", "pa", "si", "km", "sn", "yo", "so", "af", "oc", "ka", "be", "tg", "sd", "gu",
    "am", "yi", "lo", "uz", "fo", "ht", "ps", "tk", "nn", "mt", "sa", "lb", "my", "bo", "tl",
    "mg", "as", "tt", "haw", "ln", "ha", "ba", "jw", "su", "yue",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePreference {
    Cpu,
    /// CUDA when compiled in and present, CPU otherwise.
    Auto,
}

#[derive(Debug, Clone)]
pub struct WhisperOptions {
    pub model_id: String,
    pub revision: String,
    pub mel_filters_repo: String,
    /// ISO code such as `en`. `None` runs a detection pass per 30 s window on
    /// multilingual checkpoints.
    pub language: Option<String>,
    pub max_tokens_per_window: usize,
    pub inference_timeout: Duration,
    pub silence_rms_threshold: f32,
    pub device: DevicePreference,
}

impl Default for WhisperOptions {
    fn default() -> Self {
        Self {
            model_id: "openai/whisper-base".to_string(),
            revision: "main".to_string(),
            mel_filters_repo: "FL33TW00D-HF/whisper-base".to_string(),
            language: None,
            max_tokens_per_window: 224,
            inference_timeout: Duration::from_secs(120),
            silence_rms_threshold: 1e-4,
            device: DevicePreference::Cpu,
        }
    }
}

/// The process-wide model handle.
///
/// Built once at startup and shared behind an `Arc`. Whisper's decoder keeps
/// a cross-attention cache, so inference is serialized through one mutex.
pub struct CandleWhisperEngine {
    inner: Arc<WhisperInner>,
    options: WhisperOptions,
}

struct WhisperInner {
    model: InferenceSlot<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    dtype: DType,
    mel_filters: Vec<f32>,
    suppress_mask: Tensor,
    prompt: PromptTokens,
    eot_token: u32,
}

struct WindowText {
    text: String,
    truncated: bool,
}

impl CandleWhisperEngine {
    pub fn load(options: WhisperOptions) -> Result<Self, TranscriptionError> {
        let device = select_device(options.device)?;
        let dtype = Self::select_dtype(&device);

        tracing::info!(
            device = ?device,
            dtype = ?dtype,
            model = %options.model_id,
            revision = %options.revision,
            "Initializing Candle Whisper transcription engine"
        );

        let api = Api::new().map_err(|e| TranscriptionError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::with_revision(
            options.model_id.clone(),
            RepoType::Model,
            options.revision.clone(),
        ));

        let config_path = repo
            .get("config.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer.json: {}", e)))?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            TranscriptionError::ModelLoadFailed(format!("model.safetensors: {}", e))
        })?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer: {}", e)))?;

        let mel_file = match config.num_mel_bins {
            128 => "melfilters128.bytes",
            _ => "melfilters.bytes",
        };
        let mel_repo = api.repo(Repo::new(options.mel_filters_repo.clone(), RepoType::Model));
        let mel_bytes_path = mel_repo
            .get(mel_file)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("{}: {}", mel_file, e)))?;
        let mel_bytes = std::fs::read(&mel_bytes_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("mel filters: {}", e)))?;
        let mel_filters = read_mel_filters(&mel_bytes, &config)?;

        let prompt = PromptTokens::resolve(
            |token| tokenizer.token_to_id(token),
            options.language.as_deref(),
        )?;
        if prompt.detects_language() {
            tracing::info!(
                candidates = prompt.language_candidates().len(),
                "No language configured, detecting per window"
            );
        }
        let eot_token = token_id(&tokenizer, m::EOT_TOKEN)?;
        let suppress_mask = build_suppress_mask(&config, prompt.no_timestamps, &device)?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], dtype, &device)
                .map_err(|e| TranscriptionError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = m::model::Whisper::load(&vb, config.clone())
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("model: {}", e)))?;

        tracing::info!(
            mel_bins = config.num_mel_bins,
            vocab_size = config.vocab_size,
            "Candle Whisper engine loaded successfully"
        );

        Ok(Self {
            inner: Arc::new(WhisperInner {
                model: InferenceSlot::new(model),
                tokenizer,
                config,
                device,
                dtype,
                mel_filters,
                suppress_mask,
                prompt,
                eot_token,
            }),
            options,
        })
    }

    pub fn select_dtype(device: &Device) -> DType {
        if device.is_cpu() {
            DType::F32
        } else {
            DType::F16
        }
    }
}

#[async_trait]
impl TranscriptionEngine for CandleWhisperEngine {
    async fn transcribe(&self, signal: &AudioSignal) -> Result<Transcript, TranscriptionError> {
        if signal.is_silent(self.options.silence_rms_threshold) {
            return Err(TranscriptionError::EmptyAudio);
        }

        let inner = Arc::clone(&self.inner);
        let samples = signal.samples().to_vec();
        let max_tokens = self.options.max_tokens_per_window;

        run_blocking_with_timeout(self.options.inference_timeout, move |cancel| {
            inner.transcribe_pcm(&samples, max_tokens, cancel)
        })
        .await
    }

    fn model_id(&self) -> &str {
        &self.options.model_id
    }
}

impl WhisperInner {
    fn transcribe_pcm(
        &self,
        pcm: &[f32],
        max_tokens: usize,
        cancel: &CancelFlag,
    ) -> Result<Transcript, TranscriptionError> {
        let mel_windows = pcm
            .chunks(m::N_SAMPLES)
            .map(|chunk| self.mel_window(chunk))
            .collect::<Result<Vec<_>, _>>()?;

        let mut model = self.model.acquire();
        // The caller may have given up while this request queued for the slot.
        cancel.check()?;

        let mut segments: Vec<String> = Vec::new();
        let mut truncated = false;

        for (i, mel) in mel_windows.iter().enumerate() {
            tracing::debug!(window = i, "Transcribing audio window");
            model.reset_kv_cache();
            let window = self.decode_window(&mut model, mel, max_tokens, cancel)?;
            truncated |= window.truncated;
            if !window.text.is_empty() {
                segments.push(window.text);
            }
        }
        model.reset_kv_cache();

        let text = segments.join(" ");
        let outcome = if truncated {
            TranscriptOutcome::Truncated
        } else {
            TranscriptOutcome::Complete
        };

        tracing::info!(
            windows = mel_windows.len(),
            chars = text.len(),
            outcome = %outcome,
            "Audio transcription completed"
        );

        Ok(Transcript::new(text, outcome))
    }

    fn mel_window(&self, chunk: &[f32]) -> Result<Tensor, TranscriptionError> {
        let mut samples = chunk.to_vec();
        samples.resize(m::N_SAMPLES, 0.0);

        let mel_data = m::audio::pcm_to_mel(&self.config, &samples, &self.mel_filters);
        let n_mel = self.config.num_mel_bins;
        let n_frames = mel_data.len() / n_mel;

        let mel = Tensor::from_vec(mel_data, (1, n_mel, n_frames), &self.device)
            .map_err(|e| inference_error("mel tensor", e))?;
        let mel = if n_frames > m::N_FRAMES {
            mel.narrow(2, 0, m::N_FRAMES)
                .map_err(|e| inference_error("mel narrow", e))?
        } else {
            mel
        };

        mel.to_dtype(self.dtype)
            .map_err(|e| inference_error("mel dtype", e))
    }

    fn decode_window(
        &self,
        model: &mut m::model::Whisper,
        mel: &Tensor,
        max_tokens: usize,
        cancel: &CancelFlag,
    ) -> Result<WindowText, TranscriptionError> {
        cancel.check()?;
        let audio_features = model
            .encoder
            .forward(mel, true)
            .map_err(|e| inference_error("encoder", e))?;

        let language = match self.prompt.language {
            Some(token) => Some(token),
            None => self.detect_language(model, &audio_features)?,
        };
        let mut tokens = self.prompt.for_language(language);
        let prompt_len = tokens.len();
        let budget = max_tokens.min(
            self.config
                .max_target_positions
                .saturating_sub(prompt_len + 1),
        );
        let mut truncated = true;

        for step in 0..budget {
            cancel.check()?;

            let token_tensor = Tensor::new(tokens.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(|e| inference_error("token tensor", e))?;

            let ys = model
                .decoder
                .forward(&token_tensor, &audio_features, step == 0)
                .map_err(|e| inference_error("decoder", e))?;

            let (_, seq_len, _) = ys.dims3().map_err(|e| inference_error("decoder dims", e))?;
            let logits = ys
                .i((..1, seq_len - 1..))
                .and_then(|last| model.decoder.final_linear(&last))
                .and_then(|l| l.i(0))
                .and_then(|l| l.i(0))
                .and_then(|l| l.to_dtype(DType::F32))
                .and_then(|l| l.broadcast_add(&self.suppress_mask))
                .map_err(|e| inference_error("logits", e))?;

            let next_token = logits
                .argmax(D::Minus1)
                .and_then(|t| t.to_scalar::<u32>())
                .map_err(|e| inference_error("argmax", e))?;

            if next_token == self.eot_token {
                truncated = false;
                break;
            }

            tokens.push(next_token);
        }

        if truncated {
            tracing::warn!(tokens = tokens.len() - prompt_len, "Window hit token cap");
        }

        let text = self
            .tokenizer
            .decode(&tokens[prompt_len..], true)
            .map_err(|e| TranscriptionError::InferenceFailed(format!("detokenize: {}", e)))?;

        Ok(WindowText {
            text: text.trim().to_string(),
            truncated,
        })
    }

    /// One decoder step from `<|startoftranscript|>`; the most likely
    /// language token wins. `None` on English-only checkpoints.
    fn detect_language(
        &self,
        model: &mut m::model::Whisper,
        audio_features: &Tensor,
    ) -> Result<Option<u32>, TranscriptionError> {
        let candidates = self.prompt.language_candidates();
        if candidates.is_empty() {
            return Ok(None);
        }

        let sot = Tensor::new(&[[self.prompt.sot]], &self.device)
            .map_err(|e| inference_error("language prompt", e))?;
        let candidate_ids = Tensor::new(candidates, &self.device)
            .map_err(|e| inference_error("language ids", e))?;

        let ys = model
            .decoder
            .forward(&sot, audio_features, true)
            .map_err(|e| inference_error("language decoder", e))?;
        let best = ys
            .i(..1)
            .and_then(|first| model.decoder.final_linear(&first))
            .and_then(|l| l.i(0))
            .and_then(|l| l.i(0))
            .and_then(|l| l.index_select(&candidate_ids, 0))
            .and_then(|l| l.to_dtype(DType::F32))
            .and_then(|l| l.argmax(D::Minus1))
            .and_then(|t| t.to_scalar::<u32>())
            .map_err(|e| inference_error("language logits", e))?;

        let detected = candidates.get(best as usize).copied();
        if let Some(token) = detected {
            tracing::debug!(language = ?self.tokenizer.id_to_token(token), "Detected language");
        }
        Ok(detected)
    }
}

fn select_device(preference: DevicePreference) -> Result<Device, TranscriptionError> {
    match preference {
        DevicePreference::Cpu => Ok(Device::Cpu),
        DevicePreference::Auto => Device::cuda_if_available(0)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("device: {}", e))),
    }
}

/// Special tokens that open every decoding window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTokens {
    pub sot: u32,
    pub transcribe: u32,
    pub no_timestamps: u32,
    /// Fixed language token, when one is configured.
    pub language: Option<u32>,
    language_candidates: Vec<u32>,
}

impl PromptTokens {
    /// Looks the special tokens up in the vocabulary. Without a configured
    /// language, every `<|xx|>` token the vocabulary carries becomes a
    /// detection candidate.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<u32>,
        language: Option<&str>,
    ) -> Result<Self, TranscriptionError> {
        let required = |token: &str| {
            lookup(token).ok_or_else(|| {
                TranscriptionError::ModelLoadFailed(format!("token not found: {}", token))
            })
        };

        let fixed = match language {
            Some(lang) => Some(lookup(&format!("<|{}|>", lang)).ok_or_else(|| {
                TranscriptionError::ModelLoadFailed(format!("language not supported: {}", lang))
            })?),
            None => None,
        };
        let language_candidates = match fixed {
            Some(_) => Vec::new(),
            None => LANGUAGE_CODES
                .iter()
                .filter_map(|code| lookup(&format!("<|{}|>", code)))
                .collect(),
        };

        Ok(Self {
            sot: required(m::SOT_TOKEN)?,
            transcribe: required(m::TRANSCRIBE_TOKEN)?,
            no_timestamps: required(m::NO_TIMESTAMPS_TOKEN)?,
            language: fixed,
            language_candidates,
        })
    }

    pub fn detects_language(&self) -> bool {
        self.language.is_none() && !self.language_candidates.is_empty()
    }

    pub fn language_candidates(&self) -> &[u32] {
        &self.language_candidates
    }

    /// `[sot, language?, transcribe, no_timestamps]`.
    pub fn for_language(&self, language: Option<u32>) -> Vec<u32> {
        let mut tokens = vec![self.sot];
        tokens.extend(language);
        tokens.push(self.transcribe);
        tokens.push(self.no_timestamps);
        tokens
    }
}

fn build_suppress_mask(
    config: &Config,
    no_timestamps_token: u32,
    device: &Device,
) -> Result<Tensor, TranscriptionError> {
    let mask: Vec<f32> = (0..config.vocab_size as u32)
        .map(|i| {
            if config.suppress_tokens.contains(&i) || i == no_timestamps_token {
                f32::NEG_INFINITY
            } else {
                0.0
            }
        })
        .collect();

    Tensor::new(mask.as_slice(), device)
        .map_err(|e| TranscriptionError::ModelLoadFailed(format!("suppress mask: {}", e)))
}

fn token_id(tokenizer: &Tokenizer, token: &str) -> Result<u32, TranscriptionError> {
    tokenizer
        .token_to_id(token)
        .ok_or_else(|| TranscriptionError::ModelLoadFailed(format!("token not found: {}", token)))
}

fn inference_error(context: &str, e: candle_core::Error) -> TranscriptionError {
    TranscriptionError::InferenceFailed(format!("{}: {}", context, e))
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, TranscriptionError> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(TranscriptionError::ModelLoadFailed(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        )));
    }

    let filters: Vec<f32> = bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(filters)
}

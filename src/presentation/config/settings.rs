use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::application::services::PipelineOptions;
use crate::domain::MediaCredentials;
use crate::infrastructure::audio::{AudioDecoderProvider, DevicePreference, WhisperOptions};
use crate::infrastructure::media::{DEFAULT_MAX_MEDIA_BYTES, FetchOptions};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub fetch: FetchSettings,
    pub audio: AudioSettings,
    pub pipeline: PipelineSettings,
    pub staging: StagingSettings,
    pub logging: LoggingSettings,
    pub twilio: TwilioSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub model_id: String,
    pub revision: String,
    pub mel_filters_repo: String,
    pub language: Option<String>,
    pub max_tokens_per_window: usize,
    pub inference_timeout_secs: u64,
    pub silence_rms_threshold: f32,
    pub device: DeviceSetting,
}

impl Default for ModelSettings {
    fn default() -> Self {
        let defaults = WhisperOptions::default();
        Self {
            model_id: defaults.model_id,
            revision: defaults.revision,
            mel_filters_repo: defaults.mel_filters_repo,
            language: defaults.language,
            max_tokens_per_window: defaults.max_tokens_per_window,
            inference_timeout_secs: defaults.inference_timeout.as_secs(),
            silence_rms_threshold: defaults.silence_rms_threshold,
            device: DeviceSetting::Cpu,
        }
    }
}

impl ModelSettings {
    pub fn to_whisper_options(&self) -> WhisperOptions {
        WhisperOptions {
            model_id: self.model_id.clone(),
            revision: self.revision.clone(),
            mel_filters_repo: self.mel_filters_repo.clone(),
            language: self
                .language
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from),
            max_tokens_per_window: self.max_tokens_per_window,
            inference_timeout: Duration::from_secs(self.inference_timeout_secs),
            silence_rms_threshold: self.silence_rms_threshold,
            device: match self.device {
                DeviceSetting::Cpu => DevicePreference::Cpu,
                DeviceSetting::Auto => DevicePreference::Auto,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSetting {
    #[default]
    Cpu,
    Auto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub max_media_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 60,
            max_media_bytes: DEFAULT_MAX_MEDIA_BYTES,
        }
    }
}

impl FetchSettings {
    pub fn to_fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            max_media_bytes: self.max_media_bytes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub decoder: DecoderSetting,
    pub ffmpeg_path: PathBuf,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            decoder: DecoderSetting::Symphonia,
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderSetting {
    #[default]
    Symphonia,
    Ffmpeg,
}

impl From<DecoderSetting> for AudioDecoderProvider {
    fn from(setting: DecoderSetting) -> Self {
        match setting {
            DecoderSetting::Symphonia => AudioDecoderProvider::Symphonia,
            DecoderSetting::Ffmpeg => AudioDecoderProvider::Ffmpeg,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub request_deadline_secs: u64,
    pub empty_audio_is_failure: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let defaults = PipelineOptions::default();
        Self {
            request_deadline_secs: defaults.request_deadline.as_secs(),
            empty_audio_is_failure: defaults.empty_audio_is_failure,
        }
    }
}

impl PipelineSettings {
    pub fn to_pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            request_deadline: Duration::from_secs(self.request_deadline_secs),
            empty_audio_is_failure: self.empty_audio_is_failure,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagingSettings {
    pub enabled: bool,
    pub local_path: PathBuf,
}

impl Default for StagingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            local_path: std::env::temp_dir().join("murmur-staging"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive; `RUST_LOG` still wins when set.
    pub level: Option<String>,
    pub enable_json: bool,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct TwilioSettings {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for TwilioSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioSettings")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl TwilioSettings {
    /// Fill unset fields from the channel's conventional variables.
    pub fn with_env_fallbacks(mut self) -> Self {
        fn from_env(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }

        if self.account_sid.is_none() {
            self.account_sid = from_env("TWILIO_ACCOUNT_SID");
        }
        if self.auth_token.is_none() {
            self.auth_token = from_env("TWILIO_AUTH_TOKEN");
        }
        self
    }

    pub fn media_credentials(&self) -> Option<MediaCredentials> {
        match (&self.account_sid, &self.auth_token) {
            (Some(sid), Some(token)) => Some(MediaCredentials::new(sid.clone(), token.clone())),
            _ => None,
        }
    }
}

use std::time::Duration;

use config::{Config, File, FileFormat};

use murmur::infrastructure::audio::{AudioDecoderProvider, DevicePreference};
use murmur::infrastructure::media::DEFAULT_MAX_MEDIA_BYTES;
use murmur::presentation::Settings;
use murmur::presentation::config::{DecoderSetting, TwilioSettings};

fn settings_from_toml(toml: &str) -> Settings {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn given_empty_config_when_deserializing_then_every_section_has_defaults() {
    let settings = settings_from_toml("");

    assert_eq!(settings.server.port, 5000);
    assert_eq!(settings.model.model_id, "openai/whisper-base");
    assert_eq!(settings.fetch.max_media_bytes, DEFAULT_MAX_MEDIA_BYTES);
    assert_eq!(settings.audio.decoder, DecoderSetting::Symphonia);
    assert!(!settings.pipeline.empty_audio_is_failure);
    assert!(!settings.staging.enabled);
}

#[test]
fn given_partial_sections_when_deserializing_then_overrides_are_applied() {
    let settings = settings_from_toml(
        r#"
        [server]
        port = 8080

        [model]
        model_id = "openai/whisper-tiny"
        language = "en"
        device = "auto"
        inference_timeout_secs = 30

        [audio]
        decoder = "ffmpeg"
        ffmpeg_path = "/usr/bin/ffmpeg"

        [pipeline]
        request_deadline_secs = 90
        "#,
    );

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.host, "0.0.0.0");

    let whisper = settings.model.to_whisper_options();
    assert_eq!(whisper.model_id, "openai/whisper-tiny");
    assert_eq!(whisper.language.as_deref(), Some("en"));
    assert_eq!(whisper.device, DevicePreference::Auto);
    assert_eq!(whisper.inference_timeout, Duration::from_secs(30));

    assert_eq!(
        AudioDecoderProvider::from(settings.audio.decoder),
        AudioDecoderProvider::Ffmpeg
    );
    assert_eq!(
        settings.pipeline.to_pipeline_options().request_deadline,
        Duration::from_secs(90)
    );
}

#[test]
fn given_blank_language_when_converting_then_language_is_auto_detected() {
    let settings = settings_from_toml("[model]\nlanguage = \"  \"\n");

    assert!(settings.model.to_whisper_options().language.is_none());
}

#[test]
fn given_fetch_section_when_converting_then_options_carry_timeouts_and_cap() {
    let settings = settings_from_toml(
        "[fetch]\nconnect_timeout_secs = 3\ntimeout_secs = 20\nmax_media_bytes = 2048\n",
    );

    let options = settings.fetch.to_fetch_options();

    assert_eq!(options.connect_timeout, Duration::from_secs(3));
    assert_eq!(options.timeout, Duration::from_secs(20));
    assert_eq!(options.max_media_bytes, 2048);
}

#[test]
fn given_sid_and_token_when_building_credentials_then_both_are_used() {
    let twilio = TwilioSettings {
        account_sid: Some("AC123".to_string()),
        auth_token: Some("secret".to_string()),
    };

    let credentials = twilio.media_credentials().unwrap();

    assert_eq!(credentials.username, "AC123");
    assert_eq!(credentials.password, "secret");
    assert!(!format!("{:?}", twilio).contains("secret"));
}

#[test]
fn given_missing_token_when_building_credentials_then_returns_none() {
    let twilio = TwilioSettings {
        account_sid: Some("AC123".to_string()),
        ..TwilioSettings::default()
    };

    assert!(twilio.media_credentials().is_none());
}

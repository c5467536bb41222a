use std::path::Path;

use murmur::application::ports::AudioNormalizer;
use murmur::domain::RawMediaBytes;
use murmur::infrastructure::audio::{AudioDecoderProvider, AudioNormalizerFactory};

use crate::common::tone_wav;

#[test]
fn given_symphonia_provider_when_creating_then_decodes_wav() {
    let normalizer =
        AudioNormalizerFactory::create(AudioDecoderProvider::Symphonia, Path::new("ffmpeg"))
            .unwrap();

    let signal = normalizer
        .normalize(&RawMediaBytes::new(tone_wav(0.1), 200, None))
        .unwrap();

    assert_eq!(signal.len(), 1_600);
}

#[test]
fn given_ffmpeg_provider_with_missing_binary_when_creating_then_fails_fast() {
    let result = AudioNormalizerFactory::create(
        AudioDecoderProvider::Ffmpeg,
        Path::new("/nonexistent/ffmpeg-binary"),
    );

    assert!(result.is_err());
}

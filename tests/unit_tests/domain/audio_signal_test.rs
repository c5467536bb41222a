use murmur::domain::{AudioSignal, TARGET_SAMPLE_RATE};

#[test]
fn given_one_second_of_samples_when_measuring_duration_then_returns_one() {
    let signal = AudioSignal::from_mono_16khz(vec![0.1; 16_000]);

    assert_eq!(signal.sample_rate(), TARGET_SAMPLE_RATE);
    assert!((signal.duration_secs() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn given_empty_signal_when_computing_rms_then_returns_zero() {
    let signal = AudioSignal::empty();

    assert!(signal.is_empty());
    assert_eq!(signal.rms(), 0.0);
}

#[test]
fn given_constant_amplitude_when_computing_rms_then_equals_amplitude() {
    let signal = AudioSignal::from_mono_16khz(vec![-0.5, 0.5, -0.5, 0.5]);

    assert!((signal.rms() - 0.5).abs() < 1e-6);
}

#[test]
fn given_empty_signal_when_checking_silence_then_is_silent_at_any_threshold() {
    assert!(AudioSignal::empty().is_silent(0.0));
}

#[test]
fn given_near_zero_samples_when_checking_silence_then_compares_rms_to_threshold() {
    let hiss = AudioSignal::from_mono_16khz(vec![1e-5; 1_600]);
    let speech = AudioSignal::from_mono_16khz(vec![0.2, -0.2, 0.2, -0.2]);

    assert!(hiss.is_silent(1e-4));
    assert!(!hiss.is_silent(1e-6));
    assert!(!speech.is_silent(1e-4));
}

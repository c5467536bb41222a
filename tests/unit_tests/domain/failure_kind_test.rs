use murmur::domain::{
    DECODE_FAILED_MESSAGE, DOWNLOAD_FAILED_MESSAGE, FailureKind, PipelineStage,
    TRANSCRIBE_FAILED_MESSAGE,
};

#[test]
fn given_fetch_failures_when_mapping_message_then_uses_download_apology() {
    for kind in [
        FailureKind::NetworkError,
        FailureKind::MediaUnavailable,
        FailureKind::MediaTooLarge,
        FailureKind::StagingFailed,
    ] {
        assert_eq!(kind.stage(), PipelineStage::Fetching);
        assert_eq!(kind.user_message(), DOWNLOAD_FAILED_MESSAGE);
    }
}

#[test]
fn given_decode_error_when_mapping_message_then_asks_for_different_file() {
    assert_eq!(FailureKind::DecodeError.stage(), PipelineStage::Normalizing);
    assert_eq!(FailureKind::DecodeError.user_message(), DECODE_FAILED_MESSAGE);
}

#[test]
fn given_inference_failures_when_mapping_message_then_uses_transcribe_apology() {
    for kind in [
        FailureKind::InferenceTimeout,
        FailureKind::InferenceError,
        FailureKind::EmptyAudio,
    ] {
        assert_eq!(kind.stage(), PipelineStage::Transcribing);
        assert_eq!(kind.user_message(), TRANSCRIBE_FAILED_MESSAGE);
    }
}

#[test]
fn given_failure_kind_when_displayed_then_uses_screaming_case() {
    assert_eq!(FailureKind::MediaUnavailable.to_string(), "MEDIA_UNAVAILABLE");
    assert_eq!(FailureKind::InferenceTimeout.to_string(), "INFERENCE_TIMEOUT");
}

#[test]
fn given_each_stage_when_advancing_then_walks_to_done() {
    let mut stage = PipelineStage::Start;
    let mut visited = vec![stage];
    while stage != PipelineStage::Done {
        stage = stage.next();
        visited.push(stage);
    }

    assert_eq!(
        visited,
        vec![
            PipelineStage::Start,
            PipelineStage::Fetching,
            PipelineStage::Normalizing,
            PipelineStage::Transcribing,
            PipelineStage::Done,
        ]
    );
    assert_eq!(PipelineStage::Done.next(), PipelineStage::Done);
}

use murmur::domain::{
    DOWNLOAD_FAILED_MESSAGE, FailureKind, PipelineResult, PipelineStage, Transcript,
};

#[test]
fn given_success_when_rendering_reply_then_prefixes_transcription() {
    let result = PipelineResult::Success(Transcript::complete("hello world"));

    assert!(result.is_success());
    assert_eq!(result.failure_kind(), None);
    assert_eq!(result.reply_text(), "Transcription: hello world");
}

#[test]
fn given_empty_transcript_when_rendering_reply_then_prefix_is_kept() {
    let result = PipelineResult::Success(Transcript::empty());

    assert_eq!(result.reply_text(), "Transcription: ");
}

#[test]
fn given_failure_kind_when_building_result_then_stage_and_message_follow_kind() {
    let result = PipelineResult::failure(FailureKind::MediaUnavailable);

    assert_eq!(
        result,
        PipelineResult::Failure {
            stage: PipelineStage::Fetching,
            kind: FailureKind::MediaUnavailable,
            user_message: DOWNLOAD_FAILED_MESSAGE.to_string(),
        }
    );
    assert_eq!(result.reply_text(), DOWNLOAD_FAILED_MESSAGE);
}

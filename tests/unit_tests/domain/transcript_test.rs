use murmur::domain::{Transcript, TranscriptOutcome};

#[test]
fn given_whitespace_text_when_building_transcript_then_outcome_is_empty() {
    let transcript = Transcript::new("   ", TranscriptOutcome::Complete);

    assert_eq!(transcript.outcome, TranscriptOutcome::Empty);
}

#[test]
fn given_truncated_text_when_building_transcript_then_outcome_is_kept() {
    let transcript = Transcript::new("partial words", TranscriptOutcome::Truncated);

    assert_eq!(transcript.outcome, TranscriptOutcome::Truncated);
    assert_eq!(transcript.outcome.to_string(), "TRUNCATED");
}

#[test]
fn given_empty_constructor_when_inspected_then_text_is_empty() {
    let transcript = Transcript::empty();

    assert!(transcript.is_empty());
    assert_eq!(transcript.outcome, TranscriptOutcome::Empty);
}

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptOutcome {
    Complete,
    Empty,
    /// At least one window hit the decoder's token cap.
    Truncated,
}

impl TranscriptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptOutcome::Complete => "COMPLETE",
            TranscriptOutcome::Empty => "EMPTY",
            TranscriptOutcome::Truncated => "TRUNCATED",
        }
    }
}

impl fmt::Display for TranscriptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub outcome: TranscriptOutcome,
}

impl Transcript {
    pub fn new(text: impl Into<String>, outcome: TranscriptOutcome) -> Self {
        let text = text.into();
        let outcome = if text.trim().is_empty() {
            TranscriptOutcome::Empty
        } else {
            outcome
        };
        Self { text, outcome }
    }

    pub fn complete(text: impl Into<String>) -> Self {
        Self::new(text, TranscriptOutcome::Complete)
    }

    pub fn empty() -> Self {
        Self {
            text: String::new(),
            outcome: TranscriptOutcome::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Start,
    Fetching,
    Normalizing,
    Transcribing,
    Done,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Start => "START",
            PipelineStage::Fetching => "FETCHING",
            PipelineStage::Normalizing => "NORMALIZING",
            PipelineStage::Transcribing => "TRANSCRIBING",
            PipelineStage::Done => "DONE",
        }
    }

    /// Next stage on the success path; `Done` is terminal.
    pub fn next(&self) -> Self {
        match self {
            PipelineStage::Start => PipelineStage::Fetching,
            PipelineStage::Fetching => PipelineStage::Normalizing,
            PipelineStage::Normalizing => PipelineStage::Transcribing,
            PipelineStage::Transcribing | PipelineStage::Done => PipelineStage::Done,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

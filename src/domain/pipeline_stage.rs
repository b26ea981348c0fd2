use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Planning,
    Extracting,
    Transcribing,
    Merging,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Planning => "PLANNING",
            PipelineStage::Extracting => "EXTRACTING",
            PipelineStage::Transcribing => "TRANSCRIBING",
            PipelineStage::Merging => "MERGING",
            PipelineStage::Done => "DONE",
            PipelineStage::Failed => "FAILED",
        }
    }
}

impl FromStr for PipelineStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNING" => Ok(PipelineStage::Planning),
            "EXTRACTING" => Ok(PipelineStage::Extracting),
            "TRANSCRIBING" => Ok(PipelineStage::Transcribing),
            "MERGING" => Ok(PipelineStage::Merging),
            "DONE" => Ok(PipelineStage::Done),
            "FAILED" => Ok(PipelineStage::Failed),
            _ => Err(format!("Invalid pipeline stage: {}", s)),
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

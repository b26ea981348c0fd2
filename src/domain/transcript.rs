use serde::{Deserialize, Serialize};

/// One timed span of transcribed speech.
///
/// Times are milliseconds. Segments coming back from the transcription
/// service are local to the chunk that produced them (0 = chunk start) until
/// the assembler shifts them onto the episode's global time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
    /// Service-reported confidence (`avg_logprob`), passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl TranscriptSegment {
    pub fn new(start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            text: text.into(),
            confidence: None,
        }
    }

    /// Move this segment from a chunk-local time axis onto the global one.
    pub fn shifted_by(&self, offset_ms: u64) -> Self {
        Self {
            start_ms: self.start_ms + offset_ms,
            end_ms: self.end_ms + offset_ms,
            text: self.text.clone(),
            confidence: self.confidence,
        }
    }
}

/// The assembled, globally time-ordered transcript of one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

use async_trait::async_trait;

use crate::domain::TranscriptSegment;

/// One remote speech-to-text call over a single extracted chunk.
///
/// Returned segments are on the chunk's local time axis (0 = chunk start)
/// and keep the order the service produced them in.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe_chunk(
        &self,
        audio_data: &[u8],
        language: Option<&str>,
    ) -> Result<Vec<TranscriptSegment>, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// Network error, timeout, 5xx, or rate limit. Retried by the engine up
    /// to its attempt cap before escalating to `RetriesExhausted`.
    #[error("transient transcription failure: {0}")]
    Transient(String),
    /// The service explicitly rejected the uploaded content. Never retried.
    #[error("transcription service rejected content: {0}")]
    ContentRejected(String),
    /// Successful response with missing or structurally invalid segment
    /// data. Never retried; a retry cannot fix a malformed body.
    #[error("malformed transcription response: {0}")]
    MalformedResponse(String),
    #[error("transcription retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl TranscriptionError {
    /// Transient failures may succeed on retry; everything else is final.
    pub fn is_transient(&self) -> bool {
        matches!(self, TranscriptionError::Transient(_))
    }
}

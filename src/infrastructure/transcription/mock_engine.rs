use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::TranscriptSegment;

/// Scripted outcome for one chunk transcription call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Segments(Vec<TranscriptSegment>),
    Transient(String),
    Rejected(String),
    Malformed(String),
    Exhausted { attempts: u32, last_error: String },
}

impl MockOutcome {
    fn into_result(self) -> Result<Vec<TranscriptSegment>, TranscriptionError> {
        match self {
            MockOutcome::Segments(segments) => Ok(segments),
            MockOutcome::Transient(msg) => Err(TranscriptionError::Transient(msg)),
            MockOutcome::Rejected(msg) => Err(TranscriptionError::ContentRejected(msg)),
            MockOutcome::Malformed(msg) => Err(TranscriptionError::MalformedResponse(msg)),
            MockOutcome::Exhausted {
                attempts,
                last_error,
            } => Err(TranscriptionError::RetriesExhausted {
                attempts,
                last_error,
            }),
        }
    }
}

/// Test double for [`TranscriptionEngine`].
///
/// Pairs with `MockChunkExtractor`, which writes each chunk's index as the
/// artifact payload: the index is parsed back out of `audio_data` and looked
/// up in the script. Per-chunk delays let tests force completion-order
/// reordering under concurrency.
pub struct MockTranscriptionEngine {
    outcomes: HashMap<usize, MockOutcome>,
    delays: HashMap<usize, Duration>,
    calls: Mutex<Vec<usize>>,
}

impl MockTranscriptionEngine {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_outcome(mut self, chunk_index: usize, outcome: MockOutcome) -> Self {
        self.outcomes.insert(chunk_index, outcome);
        self
    }

    pub fn with_delay(mut self, chunk_index: usize, delay: Duration) -> Self {
        self.delays.insert(chunk_index, delay);
        self
    }

    /// Chunk indices in the order the engine was called.
    pub async fn calls(&self) -> Vec<usize> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockTranscriptionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe_chunk(
        &self,
        audio_data: &[u8],
        _language: Option<&str>,
    ) -> Result<Vec<TranscriptSegment>, TranscriptionError> {
        let index: usize = std::str::from_utf8(audio_data)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| {
                TranscriptionError::MalformedResponse(
                    "mock payload does not carry a chunk index".to_string(),
                )
            })?;

        self.calls.lock().await.push(index);

        if let Some(delay) = self.delays.get(&index) {
            tokio::time::sleep(*delay).await;
        }

        match self.outcomes.get(&index) {
            Some(outcome) => outcome.clone().into_result(),
            None => Ok(vec![]),
        }
    }
}

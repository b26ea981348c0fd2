use std::path::Path;

use async_trait::async_trait;

use crate::domain::{AudioSource, ChunkArtifact, ChunkPlan};

/// Materializes each planned time range as a standalone audio file under
/// `scratch_dir`, suitable for independent upload.
///
/// Artifacts are named deterministically by chunk index so re-runs are
/// inspectable and ordering is recoverable from the plan alone. The source
/// file is never mutated.
#[async_trait]
pub trait ChunkExtractor: Send + Sync {
    async fn extract(
        &self,
        source: &AudioSource,
        plan: &ChunkPlan,
        scratch_dir: &Path,
    ) -> Result<Vec<ChunkArtifact>, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("audio decoding failed: {0}")]
    DecodeFailed(String),
    #[error("chunk {index} range {start_ms}..{end_ms} ms exceeds decoded audio")]
    RangeOutOfBounds {
        index: usize,
        start_ms: u64,
        end_ms: u64,
    },
    #[error("chunk {index} write failed: {reason}")]
    WriteFailed { index: usize, reason: String },
}

impl ExtractionError {
    /// Index of the chunk that failed, when the failure is chunk-specific.
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            ExtractionError::DecodeFailed(_) => None,
            ExtractionError::RangeOutOfBounds { index, .. } => Some(*index),
            ExtractionError::WriteFailed { index, .. } => Some(*index),
        }
    }
}

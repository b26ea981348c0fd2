use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{ChunkExtractor, ExtractionError};
use crate::domain::{AudioSource, ChunkArtifact, ChunkPlan};

/// Test double for [`ChunkExtractor`].
///
/// Writes each planned chunk as a file whose bytes are the chunk index in
/// ASCII, so a scripted engine can recover the index from the upload
/// payload. `fail_at` injects an extraction failure at that chunk index,
/// after earlier chunks have already been written.
pub struct MockChunkExtractor {
    fail_at: Option<usize>,
}

impl MockChunkExtractor {
    pub fn new() -> Self {
        Self { fail_at: None }
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
        }
    }
}

impl Default for MockChunkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChunkExtractor for MockChunkExtractor {
    async fn extract(
        &self,
        _source: &AudioSource,
        plan: &ChunkPlan,
        scratch_dir: &Path,
    ) -> Result<Vec<ChunkArtifact>, ExtractionError> {
        let mut artifacts = Vec::with_capacity(plan.len());
        for chunk in plan.chunks() {
            if self.fail_at == Some(chunk.index) {
                return Err(ExtractionError::WriteFailed {
                    index: chunk.index,
                    reason: "injected extraction failure".to_string(),
                });
            }

            let path = scratch_dir.join(format!("{:05}.wav", chunk.index));
            tokio::fs::write(&path, chunk.index.to_string())
                .await
                .map_err(|e| ExtractionError::WriteFailed {
                    index: chunk.index,
                    reason: e.to_string(),
                })?;

            artifacts.push(ChunkArtifact {
                index: chunk.index,
                path,
                start_ms: chunk.start_ms,
                end_ms: chunk.end_ms,
            });
        }
        Ok(artifacts)
    }
}

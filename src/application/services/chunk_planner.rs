use crate::domain::{ChunkPlan, PlannedChunk};

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("invalid audio input: {0}")]
    InvalidInput(String),
}

/// Partition an episode into upload-sized chunks.
///
/// The average bitrate is estimated as `total_bytes / duration_ms`; the
/// source is assumed roughly constant-bitrate, so a chunk of the target
/// duration encodes to at most `byte_ceiling` bytes. Variable-bitrate
/// sources can over- or undershoot the ceiling; that approximation is
/// deliberate and inherited, not corrected here.
///
/// The target chunk duration is floored to whole milliseconds and clamped
/// to at least 1 ms, chunks are laid out at a uniform stride, and the final
/// chunk is clipped to the episode duration. Identical inputs always yield
/// an identical plan.
pub fn plan_chunks(
    duration_ms: u64,
    total_bytes: u64,
    byte_ceiling: u64,
) -> Result<ChunkPlan, PlanError> {
    if duration_ms == 0 {
        return Err(PlanError::InvalidInput(
            "audio duration is zero".to_string(),
        ));
    }
    if total_bytes == 0 {
        return Err(PlanError::InvalidInput(
            "audio byte size is zero".to_string(),
        ));
    }
    if byte_ceiling == 0 {
        return Err(PlanError::InvalidInput(
            "chunk byte ceiling is zero".to_string(),
        ));
    }

    // target = floor(byte_ceiling / bytes_per_ms), in u128 to avoid overflow
    // on large files.
    let target_ms =
        ((byte_ceiling as u128 * duration_ms as u128) / total_bytes as u128).max(1) as u64;

    let chunk_count = duration_ms.div_ceil(target_ms) as usize;
    let mut chunks = Vec::with_capacity(chunk_count);
    for index in 0..chunk_count {
        let start_ms = index as u64 * target_ms;
        let end_ms = (start_ms + target_ms).min(duration_ms);
        chunks.push(PlannedChunk {
            index,
            start_ms,
            end_ms,
        });
    }

    tracing::debug!(
        duration_ms,
        total_bytes,
        byte_ceiling,
        target_chunk_ms = target_ms,
        chunk_count,
        "Chunk plan computed"
    );

    Ok(ChunkPlan::new(chunks))
}

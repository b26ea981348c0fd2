use std::path::Path;

use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};

use crate::application::ports::{ChunkExtractor, ExtractionError};
use crate::domain::{AudioSource, ChunkArtifact, ChunkPlan};

use super::audio_decoder::{decode_audio_to_pcm, PCM_SAMPLE_RATE};

/// Extracts planned chunks as standalone 16-bit mono WAV files.
///
/// The source is decoded once per run (a single decode stream), then each
/// planned range is sliced out of the PCM buffer and written as
/// `{index:05}.wav` under the scratch directory.
pub struct WavChunkExtractor;

impl WavChunkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WavChunkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChunkExtractor for WavChunkExtractor {
    async fn extract(
        &self,
        source: &AudioSource,
        plan: &ChunkPlan,
        scratch_dir: &Path,
    ) -> Result<Vec<ChunkArtifact>, ExtractionError> {
        let data = tokio::fs::read(source.path())
            .await
            .map_err(|e| ExtractionError::DecodeFailed(format!("read source: {}", e)))?;
        let extension = source
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_string());

        let decoded = tokio::task::spawn_blocking(move || {
            decode_audio_to_pcm(&data, extension.as_deref())
        })
        .await
        .map_err(|e| ExtractionError::DecodeFailed(format!("decode task: {}", e)))??;

        let mut artifacts = Vec::with_capacity(plan.len());
        for chunk in plan.chunks() {
            let samples = decoded.slice_ms(chunk.start_ms, chunk.end_ms).ok_or(
                ExtractionError::RangeOutOfBounds {
                    index: chunk.index,
                    start_ms: chunk.start_ms,
                    end_ms: chunk.end_ms,
                },
            )?;

            let path = scratch_dir.join(chunk_file_name(chunk.index));
            write_wav(&path, samples).map_err(|e| ExtractionError::WriteFailed {
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

        tracing::info!(
            chunks = artifacts.len(),
            decoded_ms = decoded.duration_ms(),
            "Chunk artifacts extracted"
        );

        Ok(artifacts)
    }
}

fn chunk_file_name(index: usize) -> String {
    format!("{:05}.wav", index)
}

fn write_wav(path: &Path, samples: &[f32]) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: PCM_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        let clamped = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(clamped)?;
    }
    writer.finalize()
}

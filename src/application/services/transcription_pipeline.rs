use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::application::ports::{
    ChunkExtractor, ExtractionError, TranscriptionEngine, TranscriptionError,
};
use crate::application::services::chunk_planner::{plan_chunks, PlanError};
use crate::domain::{
    AudioSource, ChunkArtifact, ChunkPlan, EpisodeId, PipelineStage, Transcript,
    TranscriptSegment,
};
use crate::infrastructure::storage::ScratchDir;

const DEFAULT_BYTE_CEILING: u64 = 24 * 1024 * 1024;
const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound on the estimated encoded size of a single chunk.
    pub byte_ceiling: u64,
    /// Number of chunks transcribed in flight at once.
    pub concurrency: usize,
    /// Language hint forwarded to the transcription service.
    pub language: Option<String>,
    /// Parent directory for per-run scratch directories. System temp when
    /// unset.
    pub scratch_root: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            byte_ceiling: DEFAULT_BYTE_CEILING,
            concurrency: DEFAULT_CONCURRENCY,
            language: None,
            scratch_root: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] PlanError),
    #[error("extraction: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("chunk {index} transcription: {source}")]
    Transcription {
        index: usize,
        #[source]
        source: TranscriptionError,
    },
    #[error("scratch directory: {0}")]
    Scratch(#[from] std::io::Error),
    #[error("transcription run cancelled")]
    Cancelled,
}

type ChunkResult = (usize, Result<Vec<TranscriptSegment>, TranscriptionError>);

/// Orchestrates one episode through plan → extract → transcribe → merge.
///
/// The run is all-or-nothing: either the full ordered transcript comes back
/// or a typed error does, and the scratch directory holding the extracted
/// chunks is removed on every exit path, cancellation included.
pub struct TranscriptionPipeline {
    extractor: Arc<dyn ChunkExtractor>,
    engine: Arc<dyn TranscriptionEngine>,
    config: PipelineConfig,
}

impl TranscriptionPipeline {
    pub fn new(
        extractor: Arc<dyn ChunkExtractor>,
        engine: Arc<dyn TranscriptionEngine>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor,
            engine,
            config,
        }
    }

    pub async fn run(
        &self,
        source: &AudioSource,
        cancel: CancellationToken,
    ) -> Result<Transcript, PipelineError> {
        let episode = EpisodeId::new();
        let span = tracing::info_span!(
            "transcription_run",
            episode_id = %episode.as_uuid(),
            source = %source.path().display(),
        );
        self.run_scoped(source, episode, cancel).instrument(span).await
    }

    async fn run_scoped(
        &self,
        source: &AudioSource,
        episode: EpisodeId,
        cancel: CancellationToken,
    ) -> Result<Transcript, PipelineError> {
        let scratch = ScratchDir::create(self.config.scratch_root.as_deref(), episode)?;

        let result = self.run_stages(source, &scratch, &cancel).await;
        scratch.cleanup();

        match &result {
            Ok(transcript) => {
                self.transition(PipelineStage::Done);
                tracing::info!(segments = transcript.segments().len(), "Transcription completed");
            }
            Err(e) => {
                self.transition(PipelineStage::Failed);
                tracing::error!(error = %e, "Transcription run failed");
            }
        }

        result
    }

    async fn run_stages(
        &self,
        source: &AudioSource,
        scratch: &ScratchDir,
        cancel: &CancellationToken,
    ) -> Result<Transcript, PipelineError> {
        self.transition(PipelineStage::Planning);
        let plan = plan_chunks(source.duration_ms, source.byte_len, self.config.byte_ceiling)?;
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        self.transition(PipelineStage::Extracting);
        let artifacts = self.extractor.extract(source, &plan, scratch.path()).await?;
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        self.transition(PipelineStage::Transcribing);
        let chunk_results = self.transcribe_all(artifacts, cancel).await?;

        self.transition(PipelineStage::Merging);
        let segments = merge_chunk_segments(&plan, chunk_results);
        Ok(Transcript::new(segments))
    }

    /// Transcribe all chunk artifacts through a bounded worker pool.
    ///
    /// Workers pull from a shared queue and report `(index, result)` over a
    /// results channel; each result lands in the slot for its chunk index,
    /// so arrival order never influences output order. The first failure
    /// cancels the remaining work.
    async fn transcribe_all(
        &self,
        artifacts: Vec<ChunkArtifact>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Vec<TranscriptSegment>>, PipelineError> {
        let chunk_count = artifacts.len();
        let worker_count = self.config.concurrency.max(1).min(chunk_count.max(1));

        // Cancelling the run token must stop the workers, but an internal
        // failure must not cancel the caller's token, so workers listen on a
        // child.
        let run_cancel = cancel.child_token();

        let (work_tx, work_rx) = mpsc::channel::<ChunkArtifact>(chunk_count.max(1));
        for artifact in artifacts {
            if work_tx.send(artifact).await.is_err() {
                break;
            }
        }
        drop(work_tx);
        let work_rx = Arc::new(Mutex::new(work_rx));

        let (result_tx, mut result_rx) = mpsc::channel::<ChunkResult>(chunk_count.max(1));
        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let engine = Arc::clone(&self.engine);
            let language = self.config.language.clone();
            let work_rx = Arc::clone(&work_rx);
            let result_tx = result_tx.clone();
            let run_cancel = run_cancel.clone();
            handles.push(tokio::spawn(async move {
                worker_loop(worker_id, engine, language, work_rx, result_tx, run_cancel).await;
            }));
        }
        drop(result_tx);

        let mut slots: Vec<Option<Vec<TranscriptSegment>>> =
            (0..chunk_count).map(|_| None).collect();
        let mut first_error: Option<PipelineError> = None;

        while let Some((index, result)) = result_rx.recv().await {
            match result {
                Ok(segments) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(segments);
                    } else {
                        tracing::warn!(chunk = index, "Result for unknown chunk index dropped");
                    }
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(PipelineError::Transcription { index, source: e });
                        run_cancel.cancel();
                    } else {
                        tracing::debug!(chunk = index, "Dropping secondary chunk failure");
                    }
                }
            }
        }

        for handle in handles {
            if handle.await.is_err() {
                tracing::error!("Transcription worker panicked");
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let mut results = Vec::with_capacity(chunk_count);
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(segments) => results.push(segments),
                None => {
                    return Err(PipelineError::Transcription {
                        index,
                        source: TranscriptionError::Transient(
                            "worker stopped before completing chunk".to_string(),
                        ),
                    });
                }
            }
        }
        Ok(results)
    }

    fn transition(&self, stage: PipelineStage) {
        tracing::debug!(stage = %stage, "Pipeline stage transition");
    }
}

async fn worker_loop(
    worker_id: usize,
    engine: Arc<dyn TranscriptionEngine>,
    language: Option<String>,
    work_rx: Arc<Mutex<mpsc::Receiver<ChunkArtifact>>>,
    result_tx: mpsc::Sender<ChunkResult>,
    cancel: CancellationToken,
) {
    loop {
        let artifact = {
            let mut rx = work_rx.lock().await;
            tokio::select! {
                _ = cancel.cancelled() => None,
                artifact = rx.recv() => artifact,
            }
        };
        let Some(artifact) = artifact else {
            break;
        };

        let index = artifact.index;
        let result = match tokio::fs::read(&artifact.path).await {
            Ok(data) => {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    result = engine.transcribe_chunk(&data, language.as_deref()) => result,
                }
            }
            Err(e) => Err(TranscriptionError::Transient(format!(
                "read chunk artifact: {}",
                e
            ))),
        };

        tracing::debug!(
            worker = worker_id,
            chunk = index,
            ok = result.is_ok(),
            "Chunk transcription finished"
        );

        if result_tx.send((index, result)).await.is_err() {
            break;
        }
    }
}

/// Shift each chunk's segments onto the global time axis and concatenate in
/// chunk order.
///
/// Chunks are contiguous and disjoint and the service returns each chunk's
/// segments already locally ordered, so the concatenation is globally
/// ordered by construction.
pub fn merge_chunk_segments(
    plan: &ChunkPlan,
    per_chunk: Vec<Vec<TranscriptSegment>>,
) -> Vec<TranscriptSegment> {
    let mut merged = Vec::with_capacity(per_chunk.iter().map(Vec::len).sum());
    for (chunk, segments) in plan.chunks().iter().zip(per_chunk) {
        for segment in &segments {
            merged.push(segment.shifted_by(chunk.start_ms));
        }
    }
    merged
}

mod chunk_planner;
mod transcription_pipeline;

pub use chunk_planner::{plan_chunks, PlanError};
pub use transcription_pipeline::{
    merge_chunk_segments, PipelineConfig, PipelineError, TranscriptionPipeline,
};

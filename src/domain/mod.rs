mod audio_source;
mod chunk_plan;
mod pipeline_stage;
mod transcript;

pub use audio_source::{AudioSource, EpisodeId};
pub use chunk_plan::{ChunkArtifact, ChunkPlan, PlannedChunk};
pub use pipeline_stage::PipelineStage;
pub use transcript::{Transcript, TranscriptSegment};

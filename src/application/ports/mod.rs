mod chunk_extractor;
mod transcription_engine;

pub use chunk_extractor::{ChunkExtractor, ExtractionError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};

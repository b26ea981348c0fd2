pub mod audio_decoder;
mod mock_chunk_extractor;
mod source_prober;
mod wav_chunk_extractor;

pub use mock_chunk_extractor::MockChunkExtractor;
pub use source_prober::probe_source;
pub use wav_chunk_extractor::WavChunkExtractor;

mod mock_engine;
mod openai_whisper_engine;

pub use mock_engine::{MockOutcome, MockTranscriptionEngine};
pub use openai_whisper_engine::OpenAiWhisperEngine;

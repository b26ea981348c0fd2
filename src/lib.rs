//! Chunked transcription pipeline for podcast episodes.
//!
//! Splits an episode into upload-sized chunks, transcribes each chunk
//! against a remote speech-to-text service, and reassembles the per-chunk
//! results into a single transcript on the episode's global time axis.
//! The transcript feeds downstream ad-segment detection; feed management,
//! persistence, and audio export live with the callers of this crate.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

//! Transcription service adapters

mod assemblyai;
mod wire;

pub use assemblyai::{AssemblyAiClient, DEFAULT_BASE_URL};

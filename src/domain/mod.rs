//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod batch;
pub mod config;
pub mod error;
pub mod transcription;

// Re-export common types
pub use batch::{BatchCounters, BatchReport, FileFailure, FilePair, JobStage};
pub use config::AppConfig;
pub use error::*;
pub use transcription::{OutputFormat, Transcript, TranscribeOptions, TranscriptionConfig};

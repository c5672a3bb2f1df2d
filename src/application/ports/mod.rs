//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod progress;
pub mod transcription;

// Re-export common types
pub use config::ConfigStore;
pub use progress::{NoopUploadProgress, UploadProgress};
pub use transcription::{
    ServiceError, TranscriptHistory, TranscriptionService, DEFAULT_POLL_INTERVAL,
};

//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod batch;
pub mod manage;
pub mod ports;
pub mod transcribe;

// Re-export use cases
pub use batch::{
    BatchError, BatchObserver, BatchTranscribeUseCase, ConcurrencyLimits, NoopBatchObserver,
};
pub use manage::{ManageError, ManageTranscriptsUseCase, DEFAULT_LIST_LIMIT};
pub use transcribe::{
    render_transcript, write_output, TranscribeCallbacks, TranscribeError, TranscribeFileUseCase,
    TranscribeOutput,
};

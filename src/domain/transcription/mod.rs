//! Transcription domain module

mod formatter;
mod options;
mod output_format;
mod progress;
mod request_config;
mod speech_model;
mod transcript;

pub use formatter::format_output;
pub use options::{ContentAnalysis, CustomSpelling, TranscribeOptions};
pub use output_format::{OutputFormat, SubtitleFormat, ALL_FORMATS};
pub use progress::ProcessingProgress;
pub use request_config::{TranscriptionConfig, RECOMMENDED_SPEAKERS};
pub use speech_model::{BoostWeight, SpeechModel};
pub use transcript::{
    Exports, JobId, JobStatus, JobStatusReport, Transcript, TranscriptRef, TranscriptSummary,
    Utterance,
};

//! Batch domain module

mod file_pair;
mod job_state;
mod report;

pub use file_pair::{is_audio_file, FilePair, AUDIO_EXTENSIONS};
pub use job_state::{BatchCounters, JobStage};
pub use report::{BatchReport, FileFailure};

//! Cosmetic processing-progress estimate
//!
//! The service does not report real progress, so the percentage is a
//! heuristic: 30% once processing is first seen, then +10% per poll up to
//! 90%, and 100% only when the job completes.

use super::JobStatus;

const FIRST_PROCESSING_PERCENT: u8 = 30;
const STEP_PERCENT: u8 = 10;
const CAP_PERCENT: u8 = 90;

/// Monotonic percentage driven by observed job statuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingProgress {
    percent: u8,
    seen_processing: bool,
}

impl ProcessingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current percentage (0-100)
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Advance with a newly polled status and return the new percentage
    pub fn observe(&mut self, status: JobStatus) -> u8 {
        match status {
            JobStatus::Queued | JobStatus::Error => {}
            JobStatus::Processing if !self.seen_processing => {
                self.seen_processing = true;
                self.percent = self.percent.max(FIRST_PROCESSING_PERCENT);
            }
            JobStatus::Processing => {
                self.percent = self.percent.saturating_add(STEP_PERCENT).min(CAP_PERCENT);
            }
            JobStatus::Completed => self.percent = 100,
        }
        self.percent
    }
}

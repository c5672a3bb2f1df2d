//! Per-file job stages and the shared batch counters

use std::fmt;

/// Stage of one file's pipeline within a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStage {
    /// Waiting for an upload slot
    Queued,
    /// Holding an upload slot, bytes in flight
    Uploading,
    /// Uploaded, waiting for a processing slot
    Uploaded,
    /// Holding a processing slot, remote job running
    Processing,
    Completed,
    Failed,
}

impl JobStage {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether `self -> next` is a legal transition
    pub const fn can_transition_to(&self, next: JobStage) -> bool {
        match (self, next) {
            (Self::Queued, Self::Uploading)
            | (Self::Uploading, Self::Uploaded)
            | (Self::Uploaded, Self::Processing)
            | (Self::Processing, Self::Completed) => true,
            (from, Self::Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Uploading => "uploading",
            Self::Uploaded => "uploaded",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Live counts across a batch.
///
/// Each count tracks how many jobs currently sit in the matching stage
/// (terminal counts only grow). Used for display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCounters {
    pub uploading: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl BatchCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move one job from `from` to `to`, adjusting both counts
    pub fn transition(&mut self, from: JobStage, to: JobStage) {
        debug_assert!(
            from.can_transition_to(to),
            "illegal job transition {} -> {}",
            from,
            to
        );

        if let Some(count) = self.slot_mut(from) {
            *count = count.saturating_sub(1);
        }
        if let Some(count) = self.slot_mut(to) {
            *count += 1;
        }
    }

    /// Jobs that reached a terminal stage
    pub fn finished(&self) -> usize {
        self.completed + self.failed
    }

    fn slot_mut(&mut self, stage: JobStage) -> Option<&mut usize> {
        match stage {
            JobStage::Uploading => Some(&mut self.uploading),
            JobStage::Processing => Some(&mut self.processing),
            JobStage::Completed => Some(&mut self.completed),
            JobStage::Failed => Some(&mut self.failed),
            JobStage::Queued | JobStage::Uploaded => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let path = [
            JobStage::Queued,
            JobStage::Uploading,
            JobStage::Uploaded,
            JobStage::Processing,
            JobStage::Completed,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]));
        }
    }

    #[test]
    fn any_live_stage_can_fail() {
        for stage in [
            JobStage::Queued,
            JobStage::Uploading,
            JobStage::Uploaded,
            JobStage::Processing,
        ] {
            assert!(stage.can_transition_to(JobStage::Failed));
        }
        assert!(!JobStage::Completed.can_transition_to(JobStage::Failed));
        assert!(!JobStage::Failed.can_transition_to(JobStage::Failed));
    }

    #[test]
    fn skipping_stages_is_illegal() {
        assert!(!JobStage::Queued.can_transition_to(JobStage::Processing));
        assert!(!JobStage::Uploading.can_transition_to(JobStage::Completed));
    }

    #[test]
    fn counters_follow_a_job() {
        let mut counters = BatchCounters::new();

        counters.transition(JobStage::Queued, JobStage::Uploading);
        assert_eq!(counters.uploading, 1);

        counters.transition(JobStage::Uploading, JobStage::Uploaded);
        assert_eq!(counters.uploading, 0);
        assert_eq!(counters.processing, 0);

        counters.transition(JobStage::Uploaded, JobStage::Processing);
        assert_eq!(counters.processing, 1);

        counters.transition(JobStage::Processing, JobStage::Completed);
        assert_eq!(
            counters,
            BatchCounters {
                uploading: 0,
                processing: 0,
                completed: 1,
                failed: 0
            }
        );
    }

    #[test]
    fn failure_releases_live_count() {
        let mut counters = BatchCounters::new();
        counters.transition(JobStage::Queued, JobStage::Uploading);
        counters.transition(JobStage::Uploading, JobStage::Failed);

        assert_eq!(counters.uploading, 0);
        assert_eq!(counters.failed, 1);
        assert_eq!(counters.finished(), 1);
    }
}

//! Batch outcome

use std::path::PathBuf;

use super::JobStage;

/// A file whose pipeline did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub input: PathBuf,
    /// Stage the job was in when it failed
    pub stage: JobStage,
    pub message: String,
}

impl FileFailure {
    /// File name of the input, for display
    pub fn file_name(&self) -> String {
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

/// Aggregate result of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub completed: usize,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_file_name() {
        let failure = FileFailure {
            input: PathBuf::from("/media/b.wav"),
            stage: JobStage::Processing,
            message: "decode failure".to_string(),
        };
        assert_eq!(failure.file_name(), "b.wav");
    }

    #[test]
    fn empty_report_succeeds() {
        let report = BatchReport::default();
        assert_eq!(report.failed(), 0);
        assert!(report.all_succeeded());
    }
}

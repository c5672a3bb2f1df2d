//! Transcription service port interfaces

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transcription::{
    JobId, JobStatusReport, SubtitleFormat, Transcript, TranscriptSummary, TranscriptionConfig,
};

use super::UploadProgress;

/// Poll cadence of the default blocking wait
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Errors talking to the transcription service
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Upload failed (HTTP {status}): {body}")]
    UploadFailed { status: u16, body: String },

    #[error("Transcript not found: {0}")]
    NotFound(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to read media file: {0}")]
    Io(String),
}

/// Port for driving remote transcription jobs
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Stream a local file to the service.
    ///
    /// # Arguments
    /// * `path` - The media file to upload
    /// * `progress` - Receives cumulative bytes read from disk
    ///
    /// # Returns
    /// The upload URL to pass to `submit_job`
    async fn upload_file(
        &self,
        path: &Path,
        progress: Arc<dyn UploadProgress>,
    ) -> Result<String, ServiceError>;

    /// Create a remote transcription job for an uploaded asset
    async fn submit_job(
        &self,
        upload_url: &str,
        config: &TranscriptionConfig,
    ) -> Result<JobId, ServiceError>;

    /// Fetch the current status of a job
    async fn poll_status(&self, job: &JobId) -> Result<JobStatusReport, ServiceError>;

    /// Fetch the full transcript of a job
    async fn fetch_result(&self, job: &JobId) -> Result<Transcript, ServiceError>;

    /// Fetch the paragraph segmentation of a completed job
    async fn fetch_paragraphs(&self, job: &JobId) -> Result<Vec<String>, ServiceError>;

    /// Fetch a subtitle rendering of a completed job
    async fn fetch_subtitles(
        &self,
        job: &JobId,
        format: SubtitleFormat,
    ) -> Result<String, ServiceError>;

    /// Delay between polls in `wait_for_completion`
    fn poll_interval(&self) -> Duration {
        DEFAULT_POLL_INTERVAL
    }

    /// Block until the job reaches a terminal status
    async fn wait_for_completion(&self, job: &JobId) -> Result<JobStatusReport, ServiceError> {
        loop {
            let report = self.poll_status(job).await?;
            if report.status.is_terminal() {
                return Ok(report);
            }
            tokio::time::sleep(self.poll_interval()).await;
        }
    }
}

/// Port for browsing and removing past transcripts
#[async_trait]
pub trait TranscriptHistory: Send + Sync {
    /// List the most recent transcripts, newest first
    async fn list_transcripts(&self, limit: usize) -> Result<Vec<TranscriptSummary>, ServiceError>;

    /// Permanently delete a transcript
    async fn delete_transcript(&self, job: &JobId) -> Result<(), ServiceError>;
}

//! Transcribe file use case

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::fs;

use crate::domain::batch::FilePair;
use crate::domain::error::{FormatError, InvalidOptionError};
use crate::domain::transcription::{
    format_output, Exports, JobId, JobStatus, JobStatusReport, OutputFormat, ProcessingProgress,
    TranscribeOptions, Transcript, TranscriptionConfig, RECOMMENDED_SPEAKERS,
};

use super::ports::{
    NoopUploadProgress, ServiceError, TranscriptionService, UploadProgress, DEFAULT_POLL_INTERVAL,
};

/// Errors from the transcribe use case
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Invalid options: {0}")]
    Config(#[from] InvalidOptionError),

    #[error("Upload failed: {0}")]
    Upload(ServiceError),

    #[error("Transcription service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Transcription failed: {message}")]
    RemoteJob { message: String },

    #[error("Failed to render transcript: {0}")]
    Format(#[from] FormatError),

    #[error("Failed to write {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

/// Output from the transcribe use case
#[derive(Debug, Clone)]
pub struct TranscribeOutput {
    pub job_id: JobId,
    pub output_path: PathBuf,
    pub audio_duration_secs: Option<f64>,
}

/// Callbacks for progress and status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct TranscribeCallbacks {
    /// Receives byte-level upload progress
    pub upload_progress: Option<Arc<dyn UploadProgress>>,
    /// Called once the remote job exists
    pub on_processing_start: Option<Box<dyn Fn(&JobId) + Send + Sync>>,
    /// Called after each poll with the estimated percentage.
    /// When set, the job is polled manually instead of through the service's wait.
    pub on_processing_progress: Option<Box<dyn Fn(u8) + Send + Sync>>,
    /// Called when the job reached a terminal status
    pub on_processing_end: Option<Box<dyn Fn(&JobStatusReport) + Send + Sync>>,
}

/// Single-file transcription use case: upload, submit, wait, render, write.
///
/// The individual steps are public so the batch orchestrator can run them
/// under its own concurrency slots.
pub struct TranscribeFileUseCase<S>
where
    S: TranscriptionService,
{
    service: Arc<S>,
    poll_interval: Duration,
}

impl<S> TranscribeFileUseCase<S>
where
    S: TranscriptionService,
{
    /// Create a new use case instance
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the interval of the manual progress poll
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Upload a local file and return its upload URL
    pub async fn upload(
        &self,
        input: &Path,
        progress: Arc<dyn UploadProgress>,
    ) -> Result<String, TranscribeError> {
        tracing::debug!(file = %input.display(), "uploading");
        let url = self
            .service
            .upload_file(input, progress)
            .await
            .map_err(TranscribeError::Upload)?;
        tracing::debug!(file = %input.display(), "upload accepted");
        Ok(url)
    }

    /// Build a fresh request configuration and create the remote job
    pub async fn submit(
        &self,
        upload_url: &str,
        options: &TranscribeOptions,
    ) -> Result<JobId, TranscribeError> {
        let config = TranscriptionConfig::build(options)?;
        if config.speakers_outside_recommended_range() {
            tracing::warn!(
                speakers_expected = ?config.speakers_expected,
                "expected speaker count is outside the documented {}-{} range",
                RECOMMENDED_SPEAKERS.start(),
                RECOMMENDED_SPEAKERS.end()
            );
        }

        let job = self.service.submit_job(upload_url, &config).await?;
        tracing::debug!(job = %job, "job submitted");
        Ok(job)
    }

    /// Wait for a terminal status.
    ///
    /// With `on_progress` the job is polled at a fixed interval and the
    /// cosmetic percentage is reported; otherwise the service's own wait
    /// is used. An `Error` status becomes `TranscribeError::RemoteJob`.
    pub async fn wait(
        &self,
        job: &JobId,
        on_progress: Option<&(dyn Fn(u8) + Send + Sync)>,
    ) -> Result<JobStatusReport, TranscribeError> {
        let report = match on_progress {
            Some(callback) => self.poll_with_progress(job, callback).await?,
            None => self.service.wait_for_completion(job).await?,
        };

        match report.status {
            JobStatus::Completed => Ok(report),
            _ => Err(TranscribeError::RemoteJob {
                message: report
                    .error
                    .clone()
                    .unwrap_or_else(|| format!("job ended with status {}", report.status)),
            }),
        }
    }

    async fn poll_with_progress(
        &self,
        job: &JobId,
        on_progress: &(dyn Fn(u8) + Send + Sync),
    ) -> Result<JobStatusReport, ServiceError> {
        let mut progress = ProcessingProgress::new();
        loop {
            tokio::time::sleep(self.poll_interval).await;
            let report = self.service.poll_status(job).await?;
            on_progress(progress.observe(report.status));
            if report.status.is_terminal() {
                return Ok(report);
            }
        }
    }

    /// Fetch and render a completed job
    pub async fn render(
        &self,
        job: &JobId,
        options: &TranscribeOptions,
    ) -> Result<(Transcript, String), TranscribeError> {
        render_transcript(self.service.as_ref(), job, options.format, options.speaker_labels).await
    }

    /// Run the whole pipeline for one file
    pub async fn execute(
        &self,
        pair: &FilePair,
        options: &TranscribeOptions,
        callbacks: TranscribeCallbacks,
    ) -> Result<TranscribeOutput, TranscribeError> {
        let progress = callbacks
            .upload_progress
            .clone()
            .unwrap_or_else(|| Arc::new(NoopUploadProgress));
        let upload_url = self.upload(pair.input(), progress).await?;

        let job = self.submit(&upload_url, options).await?;

        if let Some(ref cb) = callbacks.on_processing_start {
            cb(&job);
        }

        let waited = self
            .wait(&job, callbacks.on_processing_progress.as_deref())
            .await;

        if let Some(ref cb) = callbacks.on_processing_end {
            let report = match &waited {
                Ok(report) => report.clone(),
                Err(e) => JobStatusReport::failed(e.to_string()),
            };
            cb(&report);
        }
        let report = waited?;

        let (_, rendered) = self.render(&job, options).await?;
        write_output(pair.output(), &rendered).await?;

        Ok(TranscribeOutput {
            job_id: job,
            output_path: pair.output().to_path_buf(),
            audio_duration_secs: report.audio_duration_secs,
        })
    }
}

/// Fetch a transcript plus whatever exports `format` needs, then render it
pub async fn render_transcript<S>(
    service: &S,
    job: &JobId,
    format: OutputFormat,
    speaker_labels: bool,
) -> Result<(Transcript, String), TranscribeError>
where
    S: TranscriptionService + ?Sized,
{
    let transcript = service.fetch_result(job).await?;
    if transcript.status != JobStatus::Completed {
        return Err(TranscribeError::RemoteJob {
            message: transcript
                .error
                .clone()
                .unwrap_or_else(|| format!("transcript is {}", transcript.status)),
        });
    }

    let mut exports = Exports::default();
    if format == OutputFormat::Paragraphs {
        exports.paragraphs = Some(service.fetch_paragraphs(job).await?);
    }
    if let Some(subtitle) = format.subtitle_format() {
        exports.subtitles = Some(service.fetch_subtitles(job, subtitle).await?);
    }

    let rendered = format_output(&transcript, &exports, format, speaker_labels)?;
    Ok((transcript, rendered))
}

/// Write rendered output, creating the parent directory if needed
pub async fn write_output(path: &Path, contents: &str) -> Result<(), TranscribeError> {
    let io_err = |e: std::io::Error| TranscribeError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    fs::write(path, contents).await.map_err(io_err)
}

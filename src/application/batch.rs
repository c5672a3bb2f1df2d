//! Batch transcription use case
//!
//! Runs one upload → process pipeline per file. Uploads and remote
//! processing are bounded by two independent semaphores inside a worker
//! pool of `upload + processing` slots, so a backlog in one stage never
//! starves the other and every queued job can obtain both slots.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::fs;
use tokio::sync::{AcquireError, Semaphore};

use crate::domain::batch::{
    is_audio_file, BatchCounters, BatchReport, FileFailure, FilePair, JobStage,
};
use crate::domain::transcription::{OutputFormat, TranscribeOptions};

use super::ports::{NoopUploadProgress, TranscriptionService, UploadProgress};
use super::transcribe::{write_output, TranscribeError, TranscribeFileUseCase};

/// Errors that abort a batch before any file is processed
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to read input directory {}: {message}", .path.display())]
    Discovery { path: PathBuf, message: String },

    #[error("Failed to create output directory {}: {message}", .path.display())]
    OutputDir { path: PathBuf, message: String },
}

/// Independent caps for the two pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLimits {
    upload: usize,
    processing: usize,
}

impl ConcurrencyLimits {
    /// Create limits; zero is raised to one
    pub fn new(upload: usize, processing: usize) -> Self {
        Self {
            upload: upload.max(1),
            processing: processing.max(1),
        }
    }

    pub fn upload(&self) -> usize {
        self.upload
    }

    pub fn processing(&self) -> usize {
        self.processing
    }

    /// Size of the worker pool
    pub fn worker_slots(&self) -> usize {
        self.upload + self.processing
    }
}

/// Receives batch progress. All methods default to no-ops.
pub trait BatchObserver: Send + Sync {
    /// Called with the new counts after every stage change, under the counter lock
    fn on_counts(&self, _counters: &BatchCounters, _total: usize) {}

    /// Called when a file finished successfully
    fn on_completed(&self, _pair: &FilePair) {}

    /// Called as soon as a file fails
    fn on_failure(&self, _failure: &FileFailure) {}

    /// Progress sink for one file's upload
    fn upload_progress(&self, _pair: &FilePair) -> Arc<dyn UploadProgress> {
        Arc::new(NoopUploadProgress)
    }
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBatchObserver;

impl BatchObserver for NoopBatchObserver {}

/// List the audio files directly inside `dir`, sorted by path
pub async fn discover_audio_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let discovery_err = |e: std::io::Error| BatchError::Discovery {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };

    let mut entries = fs::read_dir(dir).await.map_err(discovery_err)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(discovery_err)? {
        let path = entry.path();
        if !is_audio_file(&path) {
            continue;
        }
        // Follow symlinks; skip anything that is not a regular file
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!(file = %path.display(), error = %e, "skipping unreadable entry"),
        }
    }

    files.sort();
    Ok(files)
}

/// Pair every input with its output path
pub fn plan_pairs(inputs: Vec<PathBuf>, output_dir: &Path, format: OutputFormat) -> Vec<FilePair> {
    let pairs: Vec<FilePair> = inputs
        .into_iter()
        .map(|input| FilePair::for_input(input, output_dir, format))
        .collect();

    for (i, pair) in pairs.iter().enumerate() {
        if pairs[..i].iter().any(|p| p.output() == pair.output()) {
            tracing::warn!(
                file = %pair.input().display(),
                output = %pair.output().display(),
                "output path shared with another input; the later write wins"
            );
        }
    }

    pairs
}

#[derive(Debug, Error)]
enum JobError {
    #[error(transparent)]
    Transcribe(#[from] TranscribeError),

    #[error("Batch slots closed: {0}")]
    SlotsClosed(#[from] AcquireError),
}

/// Live counts plus the last recorded stage of every job
struct Ledger {
    counters: BatchCounters,
    stages: Vec<JobStage>,
}

/// Ledger and observer, guarded together
struct BatchState {
    ledger: Mutex<Ledger>,
    total: usize,
    observer: Arc<dyn BatchObserver>,
}

impl BatchState {
    fn new(total: usize, observer: Arc<dyn BatchObserver>) -> Self {
        Self {
            ledger: Mutex::new(Ledger {
                counters: BatchCounters::new(),
                stages: vec![JobStage::Queued; total],
            }),
            total,
            observer,
        }
    }

    /// Move job `index` to `to`; returns the stage it left
    fn advance(&self, index: usize, to: JobStage) -> JobStage {
        let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(from) = ledger.stages.get(index).copied() else {
            return to;
        };
        if from.is_terminal() {
            return from;
        }
        ledger.counters.transition(from, to);
        ledger.stages[index] = to;
        self.observer.on_counts(&ledger.counters, self.total);
        from
    }

    fn snapshot(&self) -> BatchCounters {
        self.ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counters
    }
}

/// Tracks the stage of one job and mirrors it into the shared ledger
struct JobTracker<'a> {
    state: &'a BatchState,
    index: usize,
    stage: JobStage,
}

impl<'a> JobTracker<'a> {
    fn new(state: &'a BatchState, index: usize) -> Self {
        Self {
            state,
            index,
            stage: JobStage::Queued,
        }
    }

    fn advance(&mut self, to: JobStage) {
        self.state.advance(self.index, to);
        self.stage = to;
    }
}

/// Batch transcription use case
pub struct BatchTranscribeUseCase<S>
where
    S: TranscriptionService + 'static,
{
    runner: Arc<TranscribeFileUseCase<S>>,
    limits: ConcurrencyLimits,
}

impl<S> BatchTranscribeUseCase<S>
where
    S: TranscriptionService + 'static,
{
    /// Create a new use case instance
    pub fn new(service: Arc<S>, limits: ConcurrencyLimits) -> Self {
        Self {
            runner: Arc::new(TranscribeFileUseCase::new(service)),
            limits,
        }
    }

    /// Discover the audio files in `input_dir` and transcribe them into `output_dir`.
    ///
    /// An input directory without audio files yields an empty report.
    pub async fn run_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        options: Arc<TranscribeOptions>,
        observer: Arc<dyn BatchObserver>,
    ) -> Result<BatchReport, BatchError> {
        let inputs = discover_audio_files(input_dir).await?;
        if inputs.is_empty() {
            tracing::info!(dir = %input_dir.display(), "no audio files found");
            return Ok(BatchReport::default());
        }

        fs::create_dir_all(output_dir)
            .await
            .map_err(|e| BatchError::OutputDir {
                path: output_dir.to_path_buf(),
                message: e.to_string(),
            })?;

        let pairs = plan_pairs(inputs, output_dir, options.format);
        Ok(self.run(pairs, options, observer).await)
    }

    /// Transcribe every pair. Individual failures are collected, never propagated.
    pub async fn run(
        &self,
        pairs: Vec<FilePair>,
        options: Arc<TranscribeOptions>,
        observer: Arc<dyn BatchObserver>,
    ) -> BatchReport {
        let total = pairs.len();
        tracing::info!(
            files = total,
            upload_concurrency = self.limits.upload(),
            processing_concurrency = self.limits.processing(),
            "starting batch"
        );

        let state = Arc::new(BatchState::new(total, Arc::clone(&observer)));
        let upload_slots = Arc::new(Semaphore::new(self.limits.upload()));
        let processing_slots = Arc::new(Semaphore::new(self.limits.processing()));
        let workers = Arc::new(Semaphore::new(self.limits.worker_slots()));

        let mut handles = Vec::with_capacity(total);
        for (index, pair) in pairs.into_iter().enumerate() {
            let worker = match Arc::clone(&workers).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let failure = FileFailure {
                        input: pair.input().to_path_buf(),
                        stage: JobStage::Queued,
                        message: e.to_string(),
                    };
                    state.advance(index, JobStage::Failed);
                    observer.on_failure(&failure);
                    handles.push((index, pair, None, Some(failure)));
                    continue;
                }
            };

            let runner = Arc::clone(&self.runner);
            let state = Arc::clone(&state);
            let options = Arc::clone(&options);
            let upload_slots = Arc::clone(&upload_slots);
            let processing_slots = Arc::clone(&processing_slots);
            let task_pair = pair.clone();

            let handle = tokio::spawn(async move {
                let _worker = worker;
                run_job(
                    &runner,
                    JobTracker::new(&state, index),
                    &task_pair,
                    &options,
                    &upload_slots,
                    &processing_slots,
                )
                .await
            });
            handles.push((index, pair, Some(handle), None));
        }

        let mut report = BatchReport {
            total,
            ..Default::default()
        };

        for (index, pair, handle, early_failure) in handles {
            let outcome = match (handle, early_failure) {
                (Some(handle), _) => match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::error!(file = %pair.input().display(), error = %e, "batch task aborted");
                        // Release whichever live count the task was holding
                        let stage = state.advance(index, JobStage::Failed);
                        let failure = FileFailure {
                            input: pair.input().to_path_buf(),
                            stage,
                            message: format!("worker task aborted: {}", e),
                        };
                        observer.on_failure(&failure);
                        Err(failure)
                    }
                },
                (None, Some(failure)) => Err(failure),
                (None, None) => continue,
            };

            match outcome {
                Ok(()) => report.completed += 1,
                Err(failure) => report.failures.push(failure),
            }
        }

        report.failures.sort_by(|a, b| a.input.cmp(&b.input));

        let counters = state.snapshot();
        tracing::info!(
            completed = report.completed,
            failed = report.failed(),
            total,
            "batch finished"
        );
        debug_assert_eq!(counters.finished(), total);
        debug_assert_eq!(report.completed + report.failed(), total);

        report
    }
}

async fn run_job<S>(
    runner: &TranscribeFileUseCase<S>,
    mut job: JobTracker<'_>,
    pair: &FilePair,
    options: &TranscribeOptions,
    upload_slots: &Semaphore,
    processing_slots: &Semaphore,
) -> Result<(), FileFailure>
where
    S: TranscriptionService,
{
    let state = job.state;

    let result = async {
        let upload_url = {
            let _slot = upload_slots.acquire().await?;
            job.advance(JobStage::Uploading);
            let url = runner
                .upload(pair.input(), state.observer.upload_progress(pair))
                .await?;
            job.advance(JobStage::Uploaded);
            url
        };

        let _slot = processing_slots.acquire().await?;
        job.advance(JobStage::Processing);

        let job_id = runner.submit(&upload_url, options).await?;
        tracing::info!(file = %pair.display_name(), job = %job_id, "processing");
        runner.wait(&job_id, None).await?;

        let (_, rendered) = runner.render(&job_id, options).await?;
        write_output(pair.output(), &rendered).await?;
        Ok::<_, JobError>(())
    }
    .await;

    match result {
        Ok(()) => {
            job.advance(JobStage::Completed);
            tracing::info!(file = %pair.display_name(), output = %pair.output().display(), "completed");
            state.observer.on_completed(pair);
            Ok(())
        }
        Err(e) => {
            let failure = FileFailure {
                input: pair.input().to_path_buf(),
                stage: job.stage,
                message: e.to_string(),
            };
            job.advance(JobStage::Failed);
            tracing::warn!(
                file = %pair.display_name(),
                stage = %failure.stage,
                error = %failure.message,
                "file failed"
            );
            state.observer.on_failure(&failure);
            Err(failure)
        }
    }
}

//! Transcript management use cases: list, load and delete

use std::sync::Arc;

use thiserror::Error;

use crate::domain::transcription::{JobId, OutputFormat, Transcript, TranscriptRef, TranscriptSummary};

use super::ports::{ServiceError, TranscriptHistory, TranscriptionService};
use super::transcribe::{render_transcript, TranscribeError};

/// Listing size used when resolving `-N` references
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Errors from the management use cases
#[derive(Debug, Error)]
pub enum ManageError {
    #[error("No transcript at index -{index} (only {available} listed)")]
    IndexOutOfRange { index: usize, available: usize },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Transcribe(#[from] TranscribeError),
}

/// List, load and delete remote transcripts
pub struct ManageTranscriptsUseCase<S>
where
    S: TranscriptionService + TranscriptHistory,
{
    service: Arc<S>,
    lookup_limit: usize,
}

impl<S> ManageTranscriptsUseCase<S>
where
    S: TranscriptionService + TranscriptHistory,
{
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            lookup_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Listing size used to resolve `-N`
    pub fn with_lookup_limit(mut self, limit: usize) -> Self {
        self.lookup_limit = limit.max(1);
        self
    }

    /// Most recent transcripts, newest first
    pub async fn list(&self, limit: usize) -> Result<Vec<TranscriptSummary>, ManageError> {
        let transcripts = self.service.list_transcripts(limit).await?;
        tracing::debug!(count = transcripts.len(), "listed transcripts");
        Ok(transcripts)
    }

    /// Turn a reference into a concrete job id.
    ///
    /// `-N` picks the N-th entry of the listing, counting from zero.
    pub async fn resolve(&self, reference: &TranscriptRef) -> Result<JobId, ManageError> {
        match reference {
            TranscriptRef::Id(id) => Ok(id.clone()),
            TranscriptRef::Index(index) => {
                let limit = self.lookup_limit.max(index + 1);
                let listed = self.service.list_transcripts(limit).await?;
                listed
                    .get(*index)
                    .map(|summary| summary.id.clone())
                    .ok_or(ManageError::IndexOutOfRange {
                        index: *index,
                        available: listed.len(),
                    })
            }
        }
    }

    /// Fetch and render a transcript
    pub async fn load(
        &self,
        reference: &TranscriptRef,
        format: OutputFormat,
        speaker_labels: bool,
    ) -> Result<(Transcript, String), ManageError> {
        let job = self.resolve(reference).await?;
        tracing::debug!(job = %job, format = %format, "loading transcript");
        Ok(render_transcript(self.service.as_ref(), &job, format, speaker_labels).await?)
    }

    /// Permanently delete a transcript, returning the id that was removed
    pub async fn delete(&self, reference: &TranscriptRef) -> Result<JobId, ManageError> {
        let job = self.resolve(reference).await?;
        self.service.delete_transcript(&job).await?;
        tracing::info!(job = %job, "transcript deleted");
        Ok(job)
    }
}

//! AssemblyAI v2 REST adapter

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{header, Response, StatusCode};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::application::ports::{
    ServiceError, TranscriptHistory, TranscriptionService, UploadProgress, DEFAULT_POLL_INTERVAL,
};
use crate::domain::transcription::{
    JobId, JobStatusReport, SubtitleFormat, Transcript, TranscriptSummary, TranscriptionConfig,
};

use super::wire::{
    ErrorBody, ParagraphsResponse, TranscriptListResponse, TranscriptRequest, TranscriptResponse,
    UploadResponse,
};

/// AssemblyAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";

/// AssemblyAI HTTP client
pub struct AssemblyAiClient {
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    client: reqwest::Client,
}

impl AssemblyAiClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at another host (used against mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Change the cadence of `wait_for_completion`
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2/{}", self.base_url, path)
    }

    fn transcript_url(&self, job: &JobId, suffix: Option<&str>) -> String {
        match suffix {
            Some(suffix) => self.url(&format!("transcript/{}/{}", job, suffix)),
            None => self.url(&format!("transcript/{}", job)),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ServiceError> {
        request
            .header(header::AUTHORIZATION, &self.api_key)
            .send()
            .await
            .map_err(|e| ServiceError::RequestFailed(e.to_string()))
    }

    /// Map non-success statuses onto service errors
    async fn check(response: Response, resource: &str) -> Result<Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ServiceError::InvalidApiKey),
            StatusCode::TOO_MANY_REQUESTS => Err(ServiceError::RateLimited),
            StatusCode::NOT_FOUND => Err(ServiceError::NotFound(resource.to_string())),
            _ => {
                let body = error_text(response).await;
                Err(ServiceError::ApiError(format!("HTTP {}: {}", status, body)))
            }
        }
    }

    async fn get_json<T>(&self, url: String, resource: &str) -> Result<T, ServiceError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.send(self.client.get(&url)).await?;
        Self::check(response, resource)
            .await?
            .json()
            .await
            .map_err(|e| ServiceError::ParseError(e.to_string()))
    }

    async fn fetch_transcript(
        &self,
        job: &JobId,
    ) -> Result<(TranscriptResponse, serde_json::Value), ServiceError> {
        let raw: serde_json::Value = self
            .get_json(self.transcript_url(job, None), job.as_str())
            .await?;
        let wire = serde_json::from_value(raw.clone())
            .map_err(|e| ServiceError::ParseError(e.to_string()))?;
        Ok((wire, raw))
    }
}

/// Prefer the `error` field of a JSON error body, else the raw text
async fn error_text(response: Response) -> String {
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text)
}

#[async_trait]
impl TranscriptionService for AssemblyAiClient {
    async fn upload_file(
        &self,
        path: &Path,
        progress: Arc<dyn UploadProgress>,
    ) -> Result<String, ServiceError> {
        let file = File::open(path)
            .await
            .map_err(|e| ServiceError::Io(format!("{}: {}", path.display(), e)))?;
        let size = file
            .metadata()
            .await
            .map_err(|e| ServiceError::Io(format!("{}: {}", path.display(), e)))?
            .len();

        progress.start(size);
        let sink = Arc::clone(&progress);
        let stream = ReaderStream::new(file).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                sink.advance(bytes.len() as u64);
            }
            chunk
        });

        let request = self
            .client
            .post(self.url("upload"))
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(reqwest::Body::wrap_stream(stream));
        let response = self.send(request).await?;

        // Uploads are never retried, so every rejection keeps its status and body
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::UploadFailed {
                status: status.as_u16(),
                body: error_text(response).await,
            });
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::ParseError(e.to_string()))?;
        progress.finish();
        Ok(uploaded.upload_url)
    }

    async fn submit_job(
        &self,
        upload_url: &str,
        config: &TranscriptionConfig,
    ) -> Result<JobId, ServiceError> {
        let body = TranscriptRequest::new(upload_url, config);
        let response = self
            .send(self.client.post(self.url("transcript")).json(&body))
            .await?;

        let created: TranscriptResponse = Self::check(response, "transcript")
            .await?
            .json()
            .await
            .map_err(|e| ServiceError::ParseError(e.to_string()))?;

        // The service can reject a job synchronously
        if let Some(message) = created.error {
            return Err(ServiceError::ApiError(message));
        }
        Ok(JobId::new(created.id))
    }

    async fn poll_status(&self, job: &JobId) -> Result<JobStatusReport, ServiceError> {
        let (wire, _) = self.fetch_transcript(job).await?;
        let report = wire.status_report().map_err(ServiceError::ParseError)?;
        tracing::trace!(job = %job, status = %report.status, "polled");
        Ok(report)
    }

    async fn fetch_result(&self, job: &JobId) -> Result<Transcript, ServiceError> {
        let (wire, raw) = self.fetch_transcript(job).await?;
        wire.into_transcript(raw).map_err(ServiceError::ParseError)
    }

    async fn fetch_paragraphs(&self, job: &JobId) -> Result<Vec<String>, ServiceError> {
        let response: ParagraphsResponse = self
            .get_json(self.transcript_url(job, Some("paragraphs")), job.as_str())
            .await?;
        Ok(response.paragraphs.into_iter().map(|p| p.text).collect())
    }

    async fn fetch_subtitles(
        &self,
        job: &JobId,
        format: SubtitleFormat,
    ) -> Result<String, ServiceError> {
        let response = self
            .send(self.client.get(self.transcript_url(job, Some(format.as_str()))))
            .await?;
        Self::check(response, job.as_str())
            .await?
            .text()
            .await
            .map_err(|e| ServiceError::RequestFailed(e.to_string()))
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

#[async_trait]
impl TranscriptHistory for AssemblyAiClient {
    async fn list_transcripts(&self, limit: usize) -> Result<Vec<TranscriptSummary>, ServiceError> {
        let url = format!("{}?limit={}", self.url("transcript"), limit);
        let response: TranscriptListResponse = self.get_json(url, "transcript").await?;
        response
            .transcripts
            .into_iter()
            .map(|item| item.into_summary().map_err(ServiceError::ParseError))
            .collect()
    }

    async fn delete_transcript(&self, job: &JobId) -> Result<(), ServiceError> {
        let response = self
            .send(self.client.delete(self.transcript_url(job, None)))
            .await?;
        Self::check(response, job.as_str()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_versioned() {
        let client = AssemblyAiClient::new("key").with_base_url("http://localhost:9000/");
        assert_eq!(client.url("upload"), "http://localhost:9000/v2/upload");
        assert_eq!(
            client.transcript_url(&JobId::new("abc"), Some("srt")),
            "http://localhost:9000/v2/transcript/abc/srt"
        );
        assert_eq!(
            client.transcript_url(&JobId::new("abc"), None),
            "http://localhost:9000/v2/transcript/abc"
        );
    }

    #[test]
    fn default_poll_interval() {
        let client = AssemblyAiClient::new("key");
        assert_eq!(client.poll_interval(), DEFAULT_POLL_INTERVAL);
        let client = client.with_poll_interval(Duration::from_millis(5));
        assert_eq!(client.poll_interval(), Duration::from_millis(5));
    }
}

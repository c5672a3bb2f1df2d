//! Transcript entities returned by the service

use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a remote transcription job
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    /// No further transitions happen from a terminal status
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown job status '{}'", other)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a single status poll
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatusReport {
    pub status: JobStatus,
    pub error: Option<String>,
    pub audio_duration_secs: Option<f64>,
}

impl JobStatusReport {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            error: None,
            audio_duration_secs: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Error,
            error: Some(message.into()),
            audio_duration_secs: None,
        }
    }
}

/// A contiguous speech segment attributed to one speaker
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
    /// Start offset in milliseconds
    pub start: u64,
    /// End offset in milliseconds
    pub end: u64,
}

/// A transcript as returned by the service.
///
/// `raw` keeps the full response body so the json format can reproduce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub id: JobId,
    pub status: JobStatus,
    pub text: Option<String>,
    pub utterances: Vec<Utterance>,
    pub audio_duration_secs: Option<f64>,
    pub error: Option<String>,
    pub raw: serde_json::Value,
}

/// Additional renderings fetched from the service on demand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exports {
    pub paragraphs: Option<Vec<String>>,
    pub subtitles: Option<String>,
}

/// One entry of the remote transcript listing
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSummary {
    pub id: JobId,
    pub status: JobStatus,
    pub created: Option<String>,
    pub audio_url: Option<String>,
}

/// Reference to a remote transcript: an id, or `-N` for the N-th listed entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptRef {
    Id(JobId),
    Index(usize),
}

impl FromStr for TranscriptRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("transcript id must not be empty".to_string());
        }

        if let Some(digits) = s.strip_prefix('-') {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return digits
                    .parse()
                    .map(Self::Index)
                    .map_err(|e| format!("invalid index '{}': {}", s, e));
            }
        }

        Ok(Self::Id(JobId::new(s)))
    }
}

//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::transcription::{OutputFormat, SpeechModel};

/// Default number of simultaneous uploads in batch mode
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 4;

/// Default number of simultaneously processing remote jobs in batch mode
pub const DEFAULT_PROCESSING_CONCURRENCY: usize = 8;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub format: Option<String>,
    pub speech_model: Option<String>,
    pub speaker_labels: Option<bool>,
    pub language_detection: Option<bool>,
    pub upload_concurrency: Option<usize>,
    pub processing_concurrency: Option<usize>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            format: Some(OutputFormat::default().to_string()),
            speech_model: Some(SpeechModel::default().to_string()),
            speaker_labels: Some(true),
            language_detection: Some(true),
            upload_concurrency: Some(DEFAULT_UPLOAD_CONCURRENCY),
            processing_concurrency: Some(DEFAULT_PROCESSING_CONCURRENCY),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            format: other.format.or(self.format),
            speech_model: other.speech_model.or(self.speech_model),
            speaker_labels: other.speaker_labels.or(self.speaker_labels),
            language_detection: other.language_detection.or(self.language_detection),
            upload_concurrency: other.upload_concurrency.or(self.upload_concurrency),
            processing_concurrency: other.processing_concurrency.or(self.processing_concurrency),
        }
    }

    /// Get format as parsed OutputFormat, or default if not set/invalid
    pub fn format_or_default(&self) -> OutputFormat {
        self.format
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get speech model, or default if not set/invalid
    pub fn speech_model_or_default(&self) -> SpeechModel {
        self.speech_model
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get speaker labels setting, or true if not set
    pub fn speaker_labels_or_default(&self) -> bool {
        self.speaker_labels.unwrap_or(true)
    }

    /// Get language detection setting, or true if not set
    pub fn language_detection_or_default(&self) -> bool {
        self.language_detection.unwrap_or(true)
    }

    /// Upload concurrency, never below one
    pub fn upload_concurrency_or_default(&self) -> usize {
        self.upload_concurrency
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_UPLOAD_CONCURRENCY)
    }

    /// Processing concurrency, never below one
    pub fn processing_concurrency_or_default(&self) -> usize {
        self.processing_concurrency
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PROCESSING_CONCURRENCY)
    }
}

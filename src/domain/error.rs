//! Domain error types

use thiserror::Error;

/// Error when parsing an output format name
#[derive(Debug, Clone, Error)]
#[error("Invalid output format: \"{input}\". Valid formats are: text, paragraphs, utterances, srt, vtt, json")]
pub struct InvalidFormatError {
    pub input: String,
}

/// Error when parsing a speech model name
#[derive(Debug, Clone, Error)]
#[error("Invalid speech model: \"{input}\". Valid models are: best, nano, slam-1, universal")]
pub struct InvalidSpeechModelError {
    pub input: String,
}

/// Error when parsing a boost weight
#[derive(Debug, Clone, Error)]
#[error("Invalid boost weight: \"{input}\". Valid weights are: low, default, high")]
pub struct InvalidBoostWeightError {
    pub input: String,
}

/// Error when user options cannot be turned into a request configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidOptionError {
    #[error("Expected speaker count must be greater than zero")]
    ZeroSpeakersExpected,

    #[error("audio_end_at ({end} ms) must be after audio_start_from ({start} ms)")]
    EmptyAudioWindow { start: u32, end: u32 },

    #[error("Invalid custom spelling: {0}")]
    CustomSpelling(String),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

/// Error when rendering a transcript
#[derive(Debug, Clone, Error)]
pub enum FormatError {
    #[error("Transcript has no {0} export attached")]
    MissingExport(&'static str),

    #[error("Failed to serialize transcript: {0}")]
    Serialize(String),
}

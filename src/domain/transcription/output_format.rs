//! Output format value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidFormatError;

/// All available output formats
pub const ALL_FORMATS: &[OutputFormat] = &[
    OutputFormat::Text,
    OutputFormat::Paragraphs,
    OutputFormat::Utterances,
    OutputFormat::Srt,
    OutputFormat::Vtt,
    OutputFormat::Json,
];

/// How a finished transcript is rendered to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    Text,
    Paragraphs,
    #[default]
    Utterances,
    Srt,
    Vtt,
    Json,
}

impl OutputFormat {
    /// Get the string identifier for this format
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Paragraphs => "paragraphs",
            Self::Utterances => "utterances",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Json => "json",
        }
    }

    /// Get the file extension used for output files
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Text | Self::Paragraphs | Self::Utterances => "txt",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Json => "json",
        }
    }

    /// Subtitle export needed from the service, if any
    pub const fn subtitle_format(&self) -> Option<SubtitleFormat> {
        match self {
            Self::Srt => Some(SubtitleFormat::Srt),
            Self::Vtt => Some(SubtitleFormat::Vtt),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = InvalidFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "paragraphs" => Ok(Self::Paragraphs),
            "utterances" => Ok(Self::Utterances),
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "json" => Ok(Self::Json),
            _ => Err(InvalidFormatError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subtitle exports rendered by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

impl SubtitleFormat {
    /// Path segment of the export endpoint
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

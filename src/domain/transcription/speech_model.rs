//! Speech model and vocabulary boost value objects

use std::fmt;
use std::str::FromStr;

use crate::domain::error::{InvalidBoostWeightError, InvalidSpeechModelError};

/// Recognition model requested from the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpeechModel {
    #[default]
    Best,
    Nano,
    Slam1,
    Universal,
}

impl SpeechModel {
    /// Wire name of the model
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Nano => "nano",
            Self::Slam1 => "slam-1",
            Self::Universal => "universal",
        }
    }
}

impl FromStr for SpeechModel {
    type Err = InvalidSpeechModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" => Ok(Self::Best),
            "nano" => Ok(Self::Nano),
            "slam-1" | "slam_1" | "slam1" => Ok(Self::Slam1),
            "universal" => Ok(Self::Universal),
            _ => Err(InvalidSpeechModelError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SpeechModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How strongly boosted words influence recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoostWeight {
    Low,
    #[default]
    Default,
    High,
}

impl BoostWeight {
    /// Wire name of the weight
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Default => "default",
            Self::High => "high",
        }
    }
}

impl FromStr for BoostWeight {
    type Err = InvalidBoostWeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "default" => Ok(Self::Default),
            "high" => Ok(Self::High),
            _ => Err(InvalidBoostWeightError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BoostWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

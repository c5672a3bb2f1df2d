//! Transcription request configuration builder

use crate::domain::error::InvalidOptionError;

use super::{BoostWeight, ContentAnalysis, CustomSpelling, SpeechModel, TranscribeOptions};

/// Documented range for the expected speaker count
pub const RECOMMENDED_SPEAKERS: std::ops::RangeInclusive<u32> = 2..=10;

/// Configuration sent to the service when a job is submitted.
///
/// `None` fields are omitted from the request entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionConfig {
    pub speech_model: SpeechModel,
    pub language_code: Option<String>,
    pub language_detection: Option<bool>,
    pub audio_start_from: Option<u32>,
    pub audio_end_at: Option<u32>,
    pub punctuate: bool,
    pub format_text: bool,
    pub word_boost: Vec<String>,
    pub boost_param: Option<BoostWeight>,
    pub custom_spelling: Option<CustomSpelling>,
    pub speaker_labels: bool,
    pub speakers_expected: Option<u32>,
    pub content_analysis: ContentAnalysis,
}

impl TranscriptionConfig {
    /// Map user options onto a request configuration.
    ///
    /// An explicit language code disables auto-detection, a boost list
    /// always carries a weight, and empty spelling maps are left out.
    pub fn build(options: &TranscribeOptions) -> Result<Self, InvalidOptionError> {
        if options.speakers_expected == Some(0) {
            return Err(InvalidOptionError::ZeroSpeakersExpected);
        }

        if let (Some(start), Some(end)) = (options.audio_start_from, options.audio_end_at) {
            if end <= start {
                return Err(InvalidOptionError::EmptyAudioWindow { start, end });
            }
        }

        let language_code = options
            .language_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string);

        let language_detection = match language_code {
            Some(_) => None,
            None => Some(options.language_detection),
        };

        let word_boost: Vec<String> = options
            .word_boost
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        let boost_param = if word_boost.is_empty() {
            None
        } else {
            Some(options.boost_param.unwrap_or_default())
        };

        let custom_spelling = if options.custom_spelling.is_empty() {
            None
        } else {
            Some(options.custom_spelling.clone())
        };

        Ok(Self {
            speech_model: options.speech_model,
            language_code,
            language_detection,
            audio_start_from: options.audio_start_from,
            audio_end_at: options.audio_end_at,
            punctuate: options.punctuate,
            format_text: options.format_text,
            word_boost,
            boost_param,
            custom_spelling,
            speaker_labels: options.speaker_labels,
            speakers_expected: options.speakers_expected,
            content_analysis: options.content_analysis,
        })
    }

    /// Whether the expected speaker count falls outside the documented range
    pub fn speakers_outside_recommended_range(&self) -> bool {
        self.speakers_expected
            .is_some_and(|n| !RECOMMENDED_SPEAKERS.contains(&n))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn language_code_disables_detection() {
        let options = TranscribeOptions {
            language_code: Some("de".to_string()),
            language_detection: true,
            ..Default::default()
        };

        let config = TranscriptionConfig::build(&options).unwrap();
        assert_eq!(config.language_code.as_deref(), Some("de"));
        assert_eq!(config.language_detection, None);
    }

    #[test]
    fn detection_requested_without_code() {
        let config = TranscriptionConfig::build(&TranscribeOptions::default()).unwrap();
        assert_eq!(config.language_code, None);
        assert_eq!(config.language_detection, Some(true));
    }

    #[test]
    fn blank_language_code_is_ignored() {
        let options = TranscribeOptions {
            language_code: Some("   ".to_string()),
            language_detection: false,
            ..Default::default()
        };

        let config = TranscriptionConfig::build(&options).unwrap();
        assert_eq!(config.language_code, None);
        assert_eq!(config.language_detection, Some(false));
    }

    #[test]
    fn word_boost_always_carries_weight() {
        let options = TranscribeOptions {
            word_boost: vec!["tokio".to_string(), "serde".to_string()],
            ..Default::default()
        };

        let config = TranscriptionConfig::build(&options).unwrap();
        assert_eq!(config.word_boost.len(), 2);
        assert_eq!(config.boost_param, Some(BoostWeight::Default));
    }

    #[test]
    fn explicit_weight_is_kept() {
        let options = TranscribeOptions {
            word_boost: vec!["tokio".to_string()],
            boost_param: Some(BoostWeight::High),
            ..Default::default()
        };

        let config = TranscriptionConfig::build(&options).unwrap();
        assert_eq!(config.boost_param, Some(BoostWeight::High));
    }

    #[test]
    fn weight_dropped_without_words() {
        let options = TranscribeOptions {
            word_boost: vec!["  ".to_string()],
            boost_param: Some(BoostWeight::High),
            ..Default::default()
        };

        let config = TranscriptionConfig::build(&options).unwrap();
        assert!(config.word_boost.is_empty());
        assert_eq!(config.boost_param, None);
    }

    #[test]
    fn empty_custom_spelling_omitted() {
        let config = TranscriptionConfig::build(&TranscribeOptions::default()).unwrap();
        assert!(config.custom_spelling.is_none());

        let mut rules = BTreeMap::new();
        rules.insert("SQL".to_string(), vec!["sequel".to_string()]);
        let options = TranscribeOptions {
            custom_spelling: CustomSpelling::from_rules(rules),
            ..Default::default()
        };
        let config = TranscriptionConfig::build(&options).unwrap();
        assert!(config.custom_spelling.is_some());
    }

    #[test]
    fn zero_speakers_rejected() {
        let options = TranscribeOptions {
            speakers_expected: Some(0),
            ..Default::default()
        };

        assert_eq!(
            TranscriptionConfig::build(&options).unwrap_err(),
            InvalidOptionError::ZeroSpeakersExpected
        );
    }

    #[test]
    fn speakers_outside_range_accepted_but_flagged() {
        let options = TranscribeOptions {
            speakers_expected: Some(14),
            ..Default::default()
        };

        let config = TranscriptionConfig::build(&options).unwrap();
        assert_eq!(config.speakers_expected, Some(14));
        assert!(config.speakers_outside_recommended_range());

        let options = TranscribeOptions {
            speakers_expected: Some(3),
            ..Default::default()
        };
        let config = TranscriptionConfig::build(&options).unwrap();
        assert!(!config.speakers_outside_recommended_range());
    }

    #[test]
    fn audio_window_must_not_be_empty() {
        let options = TranscribeOptions {
            audio_start_from: Some(5_000),
            audio_end_at: Some(5_000),
            ..Default::default()
        };

        assert!(matches!(
            TranscriptionConfig::build(&options),
            Err(InvalidOptionError::EmptyAudioWindow { .. })
        ));
    }

    #[test]
    fn build_is_deterministic() {
        let options = TranscribeOptions {
            word_boost: vec!["a".to_string()],
            speakers_expected: Some(2),
            ..Default::default()
        };

        assert_eq!(
            TranscriptionConfig::build(&options).unwrap(),
            TranscriptionConfig::build(&options).unwrap()
        );
    }
}

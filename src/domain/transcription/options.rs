//! User-facing transcription options

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::error::InvalidOptionError;

use super::{BoostWeight, OutputFormat, SpeechModel};

/// Custom spelling rules, keyed by the replacement text.
///
/// Each entry maps the spelling to emit (`to`) onto the recognised
/// variants it replaces (`from`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomSpelling {
    rules: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpellingSource {
    One(String),
    Many(Vec<String>),
}

impl CustomSpelling {
    /// Parse a JSON object such as `{"SQL": ["sequel", "s q l"], "Kubernetes": "cooper netties"}`.
    ///
    /// Blank keys and blank variants are dropped, so the result may be empty.
    pub fn parse(input: &str) -> Result<Self, InvalidOptionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let raw: BTreeMap<String, SpellingSource> = serde_json::from_str(trimmed)
            .map_err(|e| InvalidOptionError::CustomSpelling(e.to_string()))?;

        let rules = raw
            .into_iter()
            .filter_map(|(to, source)| {
                let to = to.trim().to_string();
                let from: Vec<String> = match source {
                    SpellingSource::One(s) => vec![s],
                    SpellingSource::Many(v) => v,
                }
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

                if to.is_empty() || from.is_empty() {
                    None
                } else {
                    Some((to, from))
                }
            })
            .collect();

        Ok(Self { rules })
    }

    /// Build from already-split rules
    pub fn from_rules(rules: BTreeMap<String, Vec<String>>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate `(to, from)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Content-analysis features layered on top of the transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentAnalysis {
    pub auto_chapters: bool,
    pub entity_detection: bool,
    pub sentiment_analysis: bool,
    pub auto_highlights: bool,
    pub topic_detection: bool,
}

/// Immutable snapshot of everything the user chose for one invocation.
///
/// Shared read-only between every job of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscribeOptions {
    pub format: OutputFormat,
    pub speech_model: SpeechModel,
    pub language_code: Option<String>,
    pub language_detection: bool,
    /// Start of the transcribed window, in milliseconds
    pub audio_start_from: Option<u32>,
    /// End of the transcribed window, in milliseconds
    pub audio_end_at: Option<u32>,
    pub punctuate: bool,
    pub format_text: bool,
    pub word_boost: Vec<String>,
    pub boost_param: Option<BoostWeight>,
    pub custom_spelling: CustomSpelling,
    pub speaker_labels: bool,
    pub speakers_expected: Option<u32>,
    pub content_analysis: ContentAnalysis,
    pub show_progress: bool,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            speech_model: SpeechModel::default(),
            language_code: None,
            language_detection: true,
            audio_start_from: None,
            audio_end_at: None,
            punctuate: true,
            format_text: true,
            word_boost: Vec::new(),
            boost_param: None,
            custom_spelling: CustomSpelling::default(),
            speaker_labels: true,
            speakers_expected: None,
            content_analysis: ContentAnalysis::default(),
            show_progress: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_and_single_values() {
        let spelling =
            CustomSpelling::parse(r#"{"SQL": ["sequel", "s q l"], "Kubernetes": "cooper netties"}"#)
                .unwrap();

        let rules: Vec<_> = spelling.iter().collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].0, "Kubernetes");
        assert_eq!(rules[0].1, ["cooper netties".to_string()]);
        assert_eq!(rules[1].0, "SQL");
        assert_eq!(rules[1].1.len(), 2);
    }

    #[test]
    fn parse_drops_blank_entries() {
        let spelling = CustomSpelling::parse(r#"{"": ["x"], "Y": [], "Z": ["  "]}"#).unwrap();
        assert!(spelling.is_empty());
    }

    #[test]
    fn parse_empty_input() {
        assert!(CustomSpelling::parse("").unwrap().is_empty());
        assert!(CustomSpelling::parse("{}").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_non_object() {
        let err = CustomSpelling::parse("[1, 2]").unwrap_err();
        assert!(matches!(err, InvalidOptionError::CustomSpelling(_)));
    }

    #[test]
    fn default_options() {
        let options = TranscribeOptions::default();
        assert_eq!(options.format, OutputFormat::Utterances);
        assert!(options.speaker_labels);
        assert!(options.language_detection);
        assert!(options.punctuate);
        assert!(!options.show_progress);
    }
}

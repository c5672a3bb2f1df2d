//! AssemblyAI v2 request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::transcription::{
    JobId, JobStatus, JobStatusReport, Transcript, TranscriptSummary, TranscriptionConfig,
    Utterance,
};

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_empty(words: &&[String]) -> bool {
    words.is_empty()
}

// Request types

#[derive(Debug, Serialize)]
pub(crate) struct TranscriptRequest<'a> {
    audio_url: &'a str,
    speech_model: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_detection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_start_from: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_end_at: Option<u32>,
    punctuate: bool,
    format_text: bool,
    #[serde(skip_serializing_if = "is_empty")]
    word_boost: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    boost_param: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_spelling: Option<Vec<SpellingRule<'a>>>,
    speaker_labels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    speakers_expected: Option<u32>,
    #[serde(skip_serializing_if = "is_false")]
    auto_chapters: bool,
    #[serde(skip_serializing_if = "is_false")]
    entity_detection: bool,
    #[serde(skip_serializing_if = "is_false")]
    sentiment_analysis: bool,
    #[serde(skip_serializing_if = "is_false")]
    auto_highlights: bool,
    /// Topic detection
    #[serde(skip_serializing_if = "is_false")]
    iab_categories: bool,
}

#[derive(Debug, Serialize)]
struct SpellingRule<'a> {
    from: &'a [String],
    to: &'a str,
}

impl<'a> TranscriptRequest<'a> {
    pub(crate) fn new(audio_url: &'a str, config: &'a TranscriptionConfig) -> Self {
        let analysis = config.content_analysis;
        Self {
            audio_url,
            speech_model: config.speech_model.as_str(),
            language_code: config.language_code.as_deref(),
            language_detection: config.language_detection,
            audio_start_from: config.audio_start_from,
            audio_end_at: config.audio_end_at,
            punctuate: config.punctuate,
            format_text: config.format_text,
            word_boost: &config.word_boost,
            boost_param: config.boost_param.map(|w| w.as_str()),
            custom_spelling: config.custom_spelling.as_ref().map(|spelling| {
                spelling
                    .iter()
                    .map(|(to, from)| SpellingRule { from, to })
                    .collect()
            }),
            speaker_labels: config.speaker_labels,
            speakers_expected: config.speakers_expected,
            auto_chapters: analysis.auto_chapters,
            entity_detection: analysis.entity_detection,
            sentiment_analysis: analysis.sentiment_analysis,
            auto_highlights: analysis.auto_highlights,
            iab_categories: analysis.topic_detection,
        }
    }
}

// Response types

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub upload_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptResponse {
    pub id: String,
    pub status: String,
    pub text: Option<String>,
    pub utterances: Option<Vec<UtteranceResponse>>,
    pub audio_duration: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UtteranceResponse {
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub end: u64,
}

impl TranscriptResponse {
    pub(crate) fn status(&self) -> Result<JobStatus, String> {
        self.status.parse()
    }

    pub(crate) fn status_report(&self) -> Result<JobStatusReport, String> {
        Ok(JobStatusReport {
            status: self.status()?,
            error: self.error.clone(),
            audio_duration_secs: self.audio_duration,
        })
    }

    pub(crate) fn into_transcript(self, raw: serde_json::Value) -> Result<Transcript, String> {
        let status = self.status()?;
        Ok(Transcript {
            id: JobId::new(self.id),
            status,
            text: self.text,
            utterances: self
                .utterances
                .unwrap_or_default()
                .into_iter()
                .map(|u| Utterance {
                    speaker: u.speaker,
                    text: u.text,
                    start: u.start,
                    end: u.end,
                })
                .collect(),
            audio_duration_secs: self.audio_duration,
            error: self.error,
            raw,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParagraphsResponse {
    pub paragraphs: Vec<ParagraphResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParagraphResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptListResponse {
    pub transcripts: Vec<TranscriptListItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptListItem {
    pub id: String,
    pub status: String,
    pub created: Option<String>,
    pub audio_url: Option<String>,
}

impl TranscriptListItem {
    pub(crate) fn into_summary(self) -> Result<TranscriptSummary, String> {
        Ok(TranscriptSummary {
            status: self.status.parse()?,
            id: JobId::new(self.id),
            created: self.created,
            audio_url: self.audio_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transcription::{BoostWeight, CustomSpelling, TranscribeOptions};

    #[test]
    fn minimal_request_omits_optional_fields() {
        let config = TranscriptionConfig::build(&TranscribeOptions::default()).unwrap();
        let body = serde_json::to_value(TranscriptRequest::new("https://cdn/x", &config)).unwrap();

        assert_eq!(body["audio_url"], "https://cdn/x");
        assert_eq!(body["speech_model"], "best");
        assert_eq!(body["language_detection"], true);
        assert_eq!(body["speaker_labels"], true);
        for absent in [
            "language_code",
            "word_boost",
            "boost_param",
            "custom_spelling",
            "speakers_expected",
            "auto_chapters",
            "iab_categories",
        ] {
            assert!(body.get(absent).is_none(), "{} should be omitted", absent);
        }
    }

    #[test]
    fn full_request_shape() {
        let options = TranscribeOptions {
            language_code: Some("de".to_string()),
            word_boost: vec!["Rust".to_string()],
            boost_param: Some(BoostWeight::High),
            custom_spelling: CustomSpelling::parse(r#"{"SQL": ["sequel", "s q l"]}"#).unwrap(),
            speakers_expected: Some(3),
            content_analysis: crate::domain::transcription::ContentAnalysis {
                topic_detection: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let config = TranscriptionConfig::build(&options).unwrap();
        let body = serde_json::to_value(TranscriptRequest::new("u", &config)).unwrap();

        assert_eq!(body["language_code"], "de");
        assert!(body.get("language_detection").is_none());
        assert_eq!(body["word_boost"], serde_json::json!(["Rust"]));
        assert_eq!(body["boost_param"], "high");
        assert_eq!(
            body["custom_spelling"],
            serde_json::json!([{ "from": ["sequel", "s q l"], "to": "SQL" }])
        );
        assert_eq!(body["speakers_expected"], 3);
        assert_eq!(body["iab_categories"], true);
    }

    #[test]
    fn transcript_response_keeps_raw() {
        let raw = serde_json::json!({
            "id": "t1",
            "status": "completed",
            "text": "hello",
            "utterances": [{ "speaker": "B", "text": "hello", "start": 10, "end": 900, "words": [] }],
            "audio_duration": 12,
            "error": null,
            "confidence": 0.93
        });
        let wire: TranscriptResponse = serde_json::from_value(raw.clone()).unwrap();
        let transcript = wire.into_transcript(raw.clone()).unwrap();

        assert_eq!(transcript.status, JobStatus::Completed);
        assert_eq!(transcript.utterances[0].speaker, "B");
        assert_eq!(transcript.audio_duration_secs, Some(12.0));
        assert_eq!(transcript.raw, raw);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let wire: TranscriptResponse =
            serde_json::from_value(serde_json::json!({ "id": "t", "status": "paused" })).unwrap();
        assert!(wire.status_report().is_err());
    }
}

//! Transcript rendering

use crate::domain::error::FormatError;

use super::{Exports, OutputFormat, Transcript};

/// Render a completed transcript in the requested format.
///
/// Pure: subtitle and paragraph exports must already be attached in
/// `exports` for the formats that need them.
pub fn format_output(
    transcript: &Transcript,
    exports: &Exports,
    format: OutputFormat,
    speaker_labels: bool,
) -> Result<String, FormatError> {
    match format {
        OutputFormat::Text => Ok(transcript.text.clone().unwrap_or_default()),
        OutputFormat::Paragraphs => {
            // Speaker grouping is not applied here; output is the same either way.
            let paragraphs = exports
                .paragraphs
                .as_ref()
                .ok_or(FormatError::MissingExport("paragraphs"))?;
            Ok(paragraphs.join("\n\n"))
        }
        OutputFormat::Utterances => Ok(render_utterances(transcript, speaker_labels)),
        OutputFormat::Srt | OutputFormat::Vtt => exports
            .subtitles
            .clone()
            .ok_or(FormatError::MissingExport(format.as_str())),
        OutputFormat::Json => serde_json::to_string_pretty(&transcript.raw)
            .map_err(|e| FormatError::Serialize(e.to_string())),
    }
}

fn render_utterances(transcript: &Transcript, speaker_labels: bool) -> String {
    if transcript.utterances.is_empty() {
        return match transcript.text.as_deref() {
            Some(text) if !text.is_empty() => format!("{}\n\n", text),
            _ => String::new(),
        };
    }

    let mut out = String::new();
    for utterance in &transcript.utterances {
        if speaker_labels {
            out.push_str(&format!("Speaker {}: {}\n\n", utterance.speaker, utterance.text));
        } else {
            out.push_str(&utterance.text);
            out.push_str("\n\n");
        }
    }
    out
}

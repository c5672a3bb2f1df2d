//! Batch input/output file pairing

use std::path::{Path, PathBuf};

use crate::domain::transcription::OutputFormat;

/// Audio/video extensions picked up by batch discovery
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "mp4", "m4a", "wav", "flac", "aac", "ogg", "opus", "webm", "wma",
];

/// Whether the path carries one of the recognised media extensions
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// An input media file and the output file its transcript is written to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePair {
    input: PathBuf,
    output: PathBuf,
}

impl FilePair {
    /// Pair an input with `output_dir/<input stem>.<format extension>`
    pub fn for_input(input: impl Into<PathBuf>, output_dir: &Path, format: OutputFormat) -> Self {
        let input = input.into();
        let mut name = input
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "transcript".into());
        name.push(".");
        name.push(format.extension());

        let output = output_dir.join(name);

        Self { input, output }
    }

    /// Pair explicit paths
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// File name of the input, for display
    pub fn display_name(&self) -> String {
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::application::DEFAULT_LIST_LIMIT;
use crate::domain::config::AppConfig;
use crate::domain::transcription::{
    BoostWeight, ContentAnalysis, CustomSpelling, OutputFormat, SpeechModel, TranscribeOptions,
    TranscriptRef,
};

/// aait - transcribe media files with AssemblyAI
#[derive(Parser, Debug)]
#[command(name = "aait")]
#[command(version)]
#[command(about = "Transcribe media files with AssemblyAI")]
#[command(long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Override the API host
    #[arg(long, env = "AAIT_API_URL", value_name = "URL", global = true, hide = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe one media file
    Convert {
        /// Media file to transcribe
        input: PathBuf,
        /// Where to write the transcript
        output: PathBuf,
        #[command(flatten)]
        options: TranscribeArgs,
    },
    /// Transcribe every audio file in a directory
    Batch {
        /// Directory containing audio files (not searched recursively)
        input_dir: PathBuf,
        /// Directory receiving one transcript per input
        output_dir: PathBuf,
        /// Maximum simultaneous uploads
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        upload_concurrency: Option<u32>,
        /// Maximum simultaneously processing jobs
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        processing_concurrency: Option<u32>,
        #[command(flatten)]
        options: TranscribeArgs,
    },
    /// List recent transcripts
    List {
        /// Number of transcripts to show
        #[arg(short = 'n', long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
    },
    /// Render a transcript by id or by -N index from `aait list`
    Load {
        /// Transcript id, or -N for the N-th entry of `aait list`
        #[arg(allow_hyphen_values = true, value_parser = parse_transcript_ref)]
        transcript: TranscriptRef,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Omit speaker labels from utterances
        #[arg(long)]
        no_speaker_labels: bool,
    },
    /// Permanently delete a transcript
    Delete {
        /// Transcript id, or -N for the N-th entry of `aait list`
        #[arg(allow_hyphen_values = true, value_parser = parse_transcript_ref)]
        transcript: TranscriptRef,
        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Transcription options shared by `convert` and `batch`
#[derive(Args, Debug, Clone, Default)]
pub struct TranscribeArgs {
    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Speech model
    #[arg(long, value_enum)]
    pub speech_model: Option<SpeechModelArg>,

    /// Language of the audio (e.g. en, de); disables language detection
    #[arg(long, value_name = "CODE")]
    pub language_code: Option<String>,

    /// Do not detect the spoken language
    #[arg(long)]
    pub no_language_detection: bool,

    /// Start transcribing at this offset
    #[arg(long, value_name = "MS")]
    pub audio_start_from: Option<u32>,

    /// Stop transcribing at this offset
    #[arg(long, value_name = "MS")]
    pub audio_end_at: Option<u32>,

    /// Disable automatic punctuation
    #[arg(long)]
    pub no_punctuate: bool,

    /// Disable text formatting (casing, numerals)
    #[arg(long)]
    pub no_format_text: bool,

    /// Words or phrases to boost, comma separated
    #[arg(long, value_name = "WORDS", value_delimiter = ',')]
    pub word_boost: Vec<String>,

    /// Weight applied to boosted words
    #[arg(long, value_enum)]
    pub boost_param: Option<BoostArg>,

    /// Spelling replacements as JSON, e.g. '{"SQL": ["sequel"]}'
    #[arg(long, value_name = "JSON", value_parser = parse_custom_spelling)]
    pub custom_spelling: Option<CustomSpelling>,

    /// Do not label speakers
    #[arg(long)]
    pub no_speaker_labels: bool,

    /// Expected number of speakers
    #[arg(long, value_name = "N")]
    pub speakers_expected: Option<u32>,

    /// Summarise the audio into chapters
    #[arg(long)]
    pub auto_chapters: bool,

    /// Detect named entities
    #[arg(long)]
    pub entity_detection: bool,

    /// Analyse sentiment per sentence
    #[arg(long)]
    pub sentiment_analysis: bool,

    /// Extract key phrases
    #[arg(long)]
    pub auto_highlights: bool,

    /// Classify topics
    #[arg(long)]
    pub topic_detection: bool,

    /// Show upload and processing progress
    #[arg(long)]
    pub progress: bool,
}

impl TranscribeArgs {
    /// Values that override the config file
    pub fn config_overrides(&self) -> AppConfig {
        AppConfig {
            format: self.format.map(|f| OutputFormat::from(f).to_string()),
            speech_model: self.speech_model.map(|m| SpeechModel::from(m).to_string()),
            speaker_labels: self.no_speaker_labels.then_some(false),
            language_detection: self.no_language_detection.then_some(false),
            ..Default::default()
        }
    }

    /// Build the immutable options snapshot from merged configuration
    pub fn to_options(&self, config: &AppConfig) -> TranscribeOptions {
        TranscribeOptions {
            format: config.format_or_default(),
            speech_model: config.speech_model_or_default(),
            language_code: self.language_code.clone(),
            language_detection: config.language_detection_or_default(),
            audio_start_from: self.audio_start_from,
            audio_end_at: self.audio_end_at,
            punctuate: !self.no_punctuate,
            format_text: !self.no_format_text,
            word_boost: self.word_boost.clone(),
            boost_param: self.boost_param.map(BoostWeight::from),
            custom_spelling: self.custom_spelling.clone().unwrap_or_default(),
            speaker_labels: config.speaker_labels_or_default(),
            speakers_expected: self.speakers_expected,
            content_analysis: ContentAnalysis {
                auto_chapters: self.auto_chapters,
                entity_detection: self.entity_detection,
                sentiment_analysis: self.sentiment_analysis,
                auto_highlights: self.auto_highlights,
                topic_detection: self.topic_detection,
            },
            show_progress: self.progress,
        }
    }
}

fn parse_transcript_ref(value: &str) -> Result<TranscriptRef, String> {
    value.parse()
}

fn parse_custom_spelling(value: &str) -> Result<CustomSpelling, String> {
    CustomSpelling::parse(value).map_err(|e| e.to_string())
}

/// Output format argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Paragraphs,
    Utterances,
    Srt,
    Vtt,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Paragraphs => OutputFormat::Paragraphs,
            FormatArg::Utterances => OutputFormat::Utterances,
            FormatArg::Srt => OutputFormat::Srt,
            FormatArg::Vtt => OutputFormat::Vtt,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Speech model argument
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SpeechModelArg {
    Best,
    Nano,
    #[value(name = "slam-1")]
    Slam1,
    Universal,
}

impl From<SpeechModelArg> for SpeechModel {
    fn from(arg: SpeechModelArg) -> Self {
        match arg {
            SpeechModelArg::Best => SpeechModel::Best,
            SpeechModelArg::Nano => SpeechModel::Nano,
            SpeechModelArg::Slam1 => SpeechModel::Slam1,
            SpeechModelArg::Universal => SpeechModel::Universal,
        }
    }
}

/// Word boost weight argument
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BoostArg {
    Low,
    Default,
    High,
}

impl From<BoostArg> for BoostWeight {
    fn from(arg: BoostArg) -> Self {
        match arg {
            BoostArg::Low => BoostWeight::Low,
            BoostArg::Default => BoostWeight::Default,
            BoostArg::High => BoostWeight::High,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "format",
    "speech_model",
    "speaker_labels",
    "language_detection",
    "upload_concurrency",
    "processing_concurrency",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transcription::JobId;
    use clap::CommandFactory;

    fn transcribe_args(cli: Cli) -> TranscribeArgs {
        match cli.command {
            Commands::Convert { options, .. } | Commands::Batch { options, .. } => options,
            other => panic!("expected convert or batch, got {:?}", other),
        }
    }

    #[test]
    fn convert_defaults() {
        let cli = Cli::parse_from(["aait", "convert", "in.mp3", "out.txt"]);
        assert_eq!(cli.verbose, 0);
        let options = transcribe_args(cli).to_options(&AppConfig::defaults());
        assert_eq!(options, TranscribeOptions::default());
    }

    #[test]
    fn convert_with_options() {
        let cli = Cli::parse_from([
            "aait",
            "convert",
            "in.mp3",
            "out.srt",
            "--format",
            "srt",
            "--speech-model",
            "slam-1",
            "--word-boost",
            "Rust,tokio",
            "--boost-param",
            "high",
            "--custom-spelling",
            r#"{"SQL": "sequel"}"#,
            "--no-speaker-labels",
            "--speakers-expected",
            "3",
            "--topic-detection",
            "--progress",
        ]);
        let args = transcribe_args(cli);
        let merged = AppConfig::defaults().merge(args.config_overrides());
        let options = args.to_options(&merged);

        assert_eq!(options.format, OutputFormat::Srt);
        assert_eq!(options.speech_model, SpeechModel::Slam1);
        assert_eq!(options.word_boost, ["Rust", "tokio"]);
        assert_eq!(options.boost_param, Some(BoostWeight::High));
        assert!(!options.custom_spelling.is_empty());
        assert!(!options.speaker_labels);
        assert_eq!(options.speakers_expected, Some(3));
        assert!(options.content_analysis.topic_detection);
        assert!(options.show_progress);
    }

    #[test]
    fn config_file_applies_without_flags() {
        let cli = Cli::parse_from(["aait", "convert", "in.mp3", "out.json"]);
        let args = transcribe_args(cli);
        let file = AppConfig {
            format: Some("json".to_string()),
            speaker_labels: Some(false),
            ..Default::default()
        };
        let merged = AppConfig::defaults().merge(file).merge(args.config_overrides());
        let options = args.to_options(&merged);

        assert_eq!(options.format, OutputFormat::Json);
        assert!(!options.speaker_labels);
    }

    #[test]
    fn invalid_custom_spelling_is_usage_error() {
        let err = Cli::try_parse_from([
            "aait",
            "convert",
            "a.mp3",
            "a.txt",
            "--custom-spelling",
            "not json",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn batch_concurrency() {
        let cli = Cli::parse_from([
            "aait",
            "batch",
            "in",
            "out",
            "--upload-concurrency",
            "2",
            "--processing-concurrency",
            "5",
        ]);
        match cli.command {
            Commands::Batch {
                upload_concurrency,
                processing_concurrency,
                ..
            } => {
                assert_eq!(upload_concurrency, Some(2));
                assert_eq!(processing_concurrency, Some(5));
            }
            other => panic!("expected batch, got {:?}", other),
        }
    }

    #[test]
    fn batch_rejects_zero_concurrency() {
        assert!(
            Cli::try_parse_from(["aait", "batch", "in", "out", "--upload-concurrency", "0"]).is_err()
        );
    }

    #[test]
    fn load_accepts_negative_index() {
        let cli = Cli::parse_from(["aait", "load", "-2", "--format", "text"]);
        match cli.command {
            Commands::Load {
                transcript, format, ..
            } => {
                assert_eq!(transcript, TranscriptRef::Index(2));
                assert_eq!(format, Some(FormatArg::Text));
            }
            other => panic!("expected load, got {:?}", other),
        }
    }

    #[test]
    fn delete_by_id() {
        let cli = Cli::parse_from(["aait", "delete", "abc123", "--force"]);
        match cli.command {
            Commands::Delete { transcript, force } => {
                assert_eq!(transcript, TranscriptRef::Id(JobId::new("abc123")));
                assert!(force);
            }
            other => panic!("expected delete, got {:?}", other),
        }
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["aait", "list", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["aait", "config", "set", "format", "srt"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "format");
            assert_eq!(value, "srt");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("api_key"));
        assert!(is_valid_config_key("upload_concurrency"));
        assert!(!is_valid_config_key("duration"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}

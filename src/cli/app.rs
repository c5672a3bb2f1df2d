//! Command runners

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::{ConfigStore, ServiceError};
use crate::application::{
    write_output, BatchTranscribeUseCase, ConcurrencyLimits,
    ManageTranscriptsUseCase, TranscribeCallbacks, TranscribeError, TranscribeFileUseCase,
};
use crate::domain::batch::{BatchReport, FilePair};
use crate::domain::config::AppConfig;
use crate::domain::transcription::{
    JobId, JobStatusReport, OutputFormat, TranscribeOptions, TranscriptRef, TranscriptionConfig,
};
use crate::infrastructure::{ApiKeyResolver, AssemblyAiClient, CredentialError, XdgConfigStore};

use super::args::{FormatArg, TranscribeArgs};
use super::presenter::Presenter;
use super::progress::{BatchProgressDisplay, ProcessingBar, UploadBar};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Connection settings shared by every command that talks to the service
#[derive(Debug, Clone, Default)]
pub struct ServiceSettings {
    /// Override of the API host
    pub base_url: Option<String>,
}

/// Batch-only settings from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchArgs {
    pub upload_concurrency: Option<usize>,
    pub processing_concurrency: Option<usize>,
}

/// Load the config file, treating problems as an empty config
pub async fn load_file_config() -> AppConfig {
    XdgConfigStore::new().load_or_empty().await
}

/// Merge configuration: defaults < file < CLI
pub fn merge_config(file_config: AppConfig, cli_config: AppConfig) -> AppConfig {
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Resolve the API key from the environment, `.env` files or the config file
pub fn get_api_key(file_config: &AppConfig) -> Result<String, CredentialError> {
    let (key, source) = ApiKeyResolver::standard(file_config.api_key.clone()).resolve()?;
    tracing::debug!(source = %source, "using API key");
    Ok(key)
}

fn connect(settings: &ServiceSettings, api_key: String) -> Arc<AssemblyAiClient> {
    let client = AssemblyAiClient::new(api_key);
    let client = match &settings.base_url {
        Some(url) => client.with_base_url(url.as_str()),
        None => client,
    };
    Arc::new(client)
}

/// Reject option combinations before any upload happens
fn validate_options(options: &TranscribeOptions, presenter: &Presenter) -> bool {
    match TranscriptionConfig::build(options) {
        Ok(_) => true,
        Err(e) => {
            presenter.error(&format!("Invalid options: {}", e));
            false
        }
    }
}

/// Run `convert`
pub async fn run_convert(
    settings: &ServiceSettings,
    input: PathBuf,
    output: PathBuf,
    args: TranscribeArgs,
) -> ExitCode {
    let mut presenter = Presenter::new();

    let file_config = load_file_config().await;
    let api_key = match get_api_key(&file_config) {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let config = merge_config(file_config, args.config_overrides());
    let options = args.to_options(&config);
    if !validate_options(&options, &presenter) {
        return ExitCode::from(EXIT_ERROR);
    }

    if !input.is_file() {
        presenter.error(&format!("Input file not found: {}", input.display()));
        return ExitCode::from(EXIT_ERROR);
    }

    let use_case = TranscribeFileUseCase::new(connect(settings, api_key));
    let pair = FilePair::new(input, output);
    let name = pair.display_name();
    presenter.info(&format!("Uploading and transcribing {}", pair.input().display()));

    let result = if options.show_progress {
        let processing = ProcessingBar::new(&name);
        let on_start = processing.clone();
        let on_progress = processing.clone();
        let callbacks = TranscribeCallbacks {
            upload_progress: Some(Arc::new(UploadBar::new(&name))),
            on_processing_start: Some(Box::new(move |_: &JobId| on_start.show())),
            on_processing_progress: Some(Box::new(move |percent: u8| {
                on_progress.set_percent(percent)
            })),
            on_processing_end: Some(Box::new(move |_: &JobStatusReport| processing.finish())),
            ..Default::default()
        };
        use_case.execute(&pair, &options, callbacks).await
    } else {
        presenter.start_spinner(&format!("Transcribing {}...", name));
        let result = use_case
            .execute(&pair, &options, TranscribeCallbacks::default())
            .await;
        presenter.stop_spinner();
        result
    };

    match result {
        Ok(output) => {
            let duration = output
                .audio_duration_secs
                .map(|secs| format!(" ({:.0}s of audio)", secs))
                .unwrap_or_default();
            presenter.success(&format!(
                "Saved to {}{}",
                output.output_path.display(),
                duration
            ));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            if let Some(hint) = failure_hint(&e) {
                presenter.info(hint);
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Extra guidance for failures the user can fix locally
fn failure_hint(error: &TranscribeError) -> Option<&'static str> {
    match error {
        TranscribeError::Upload(ServiceError::UploadFailed { status: 401, .. }) => {
            Some("Check the API key in ASSEMBLY_AI_KEY, .env or the config file")
        }
        TranscribeError::Upload(ServiceError::UploadFailed { status: 429, .. }) => {
            Some("Rate limited; lower --upload-concurrency or retry later")
        }
        _ => None,
    }
}

/// Run `batch`
pub async fn run_batch(
    settings: &ServiceSettings,
    input_dir: PathBuf,
    output_dir: PathBuf,
    batch: BatchArgs,
    args: TranscribeArgs,
) -> ExitCode {
    let presenter = Presenter::new();

    let file_config = load_file_config().await;
    let api_key = match get_api_key(&file_config) {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let cli_config = AppConfig {
        upload_concurrency: batch.upload_concurrency,
        processing_concurrency: batch.processing_concurrency,
        ..args.config_overrides()
    };
    let config = merge_config(file_config, cli_config);
    let options = args.to_options(&config);
    if !validate_options(&options, &presenter) {
        return ExitCode::from(EXIT_ERROR);
    }

    let limits = ConcurrencyLimits::new(
        config.upload_concurrency_or_default(),
        config.processing_concurrency_or_default(),
    );
    presenter.info(&format!(
        "Transcribing audio files in {} (uploads: {}, processing: {})",
        input_dir.display(),
        limits.upload(),
        limits.processing()
    ));

    let display = Arc::new(BatchProgressDisplay::new(options.show_progress));
    let use_case = BatchTranscribeUseCase::new(connect(settings, api_key), limits);
    let result = use_case
        .run_directory(&input_dir, &output_dir, Arc::new(options), display.clone())
        .await;
    display.finish();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if report.total == 0 {
        presenter.warn(&format!("No audio files found in {}", input_dir.display()));
        return ExitCode::from(EXIT_SUCCESS);
    }

    present_report(&presenter, &report, &output_dir);
    ExitCode::from(EXIT_SUCCESS)
}

fn present_report(presenter: &Presenter, report: &BatchReport, output_dir: &Path) {
    presenter.success(&format!(
        "{}/{} files transcribed into {}",
        report.completed,
        report.total,
        output_dir.display()
    ));

    if !report.all_succeeded() {
        presenter.warn(&format!("{} failed:", report.failed()));
        for failure in &report.failures {
            presenter.error(&format!(
                "{} ({}): {}",
                failure.file_name(),
                failure.stage,
                failure.message
            ));
        }
    }
}

async fn management(
    settings: &ServiceSettings,
    presenter: &Presenter,
) -> Option<(ManageTranscriptsUseCase<AssemblyAiClient>, AppConfig)> {
    let file_config = load_file_config().await;
    match get_api_key(&file_config) {
        Ok(key) => Some((
            ManageTranscriptsUseCase::new(connect(settings, key)),
            merge_config(file_config, AppConfig::empty()),
        )),
        Err(e) => {
            presenter.error(&e.to_string());
            None
        }
    }
}

/// Run `list`
pub async fn run_list(settings: &ServiceSettings, limit: usize) -> ExitCode {
    let presenter = Presenter::new();
    let Some((use_case, _)) = management(settings, &presenter).await else {
        return ExitCode::from(EXIT_ERROR);
    };

    match use_case.list(limit).await {
        Ok(transcripts) => {
            if transcripts.is_empty() {
                presenter.info("No transcripts");
            }
            for summary in &transcripts {
                presenter.transcript_row(summary);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run `load`
pub async fn run_load(
    settings: &ServiceSettings,
    reference: TranscriptRef,
    format: Option<FormatArg>,
    output: Option<PathBuf>,
    no_speaker_labels: bool,
) -> ExitCode {
    let presenter = Presenter::new();
    let Some((use_case, config)) = management(settings, &presenter).await else {
        return ExitCode::from(EXIT_ERROR);
    };

    let format = format
        .map(OutputFormat::from)
        .unwrap_or_else(|| config.format_or_default());
    let speaker_labels = !no_speaker_labels && config.speaker_labels_or_default();

    let (transcript, rendered) = match use_case.load(&reference, format, speaker_labels).await {
        Ok(loaded) => loaded,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match output {
        Some(path) => match write_output(&path, &rendered).await {
            Ok(()) => {
                presenter.success(&format!(
                    "Loaded transcript {} into {}",
                    transcript.id,
                    path.display()
                ));
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                presenter.error(&e.to_string());
                ExitCode::from(EXIT_ERROR)
            }
        },
        None => {
            presenter.output_raw(&rendered);
            ExitCode::from(EXIT_SUCCESS)
        }
    }
}

/// Run `delete`
pub async fn run_delete(
    settings: &ServiceSettings,
    reference: TranscriptRef,
    force: bool,
) -> ExitCode {
    let presenter = Presenter::new();
    let Some((use_case, _)) = management(settings, &presenter).await else {
        return ExitCode::from(EXIT_ERROR);
    };

    let job = match use_case.resolve(&reference).await {
        Ok(job) => job,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if !force && !presenter.confirm(&format!("Permanently delete transcript {}?", job)) {
        presenter.info("Aborted");
        return ExitCode::from(EXIT_SUCCESS);
    }

    match use_case.delete(&TranscriptRef::Id(job)).await {
        Ok(job) => {
            presenter.success(&format!("Deleted transcript {}", job));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_override_file() {
        let file = AppConfig {
            format: Some("json".to_string()),
            upload_concurrency: Some(2),
            ..Default::default()
        };
        let cli = AppConfig {
            upload_concurrency: Some(6),
            ..Default::default()
        };

        let merged = merge_config(file, cli);
        assert_eq!(merged.format_or_default(), OutputFormat::Json);
        assert_eq!(merged.upload_concurrency_or_default(), 6);
        assert_eq!(
            merged.processing_concurrency_or_default(),
            crate::domain::config::DEFAULT_PROCESSING_CONCURRENCY
        );
    }

    #[test]
    fn rejected_uploads_get_a_hint() {
        let upload = |status| {
            TranscribeError::Upload(ServiceError::UploadFailed {
                status,
                body: "nope".to_string(),
            })
        };
        assert!(failure_hint(&upload(401)).is_some_and(|hint| hint.contains("ASSEMBLY_AI_KEY")));
        assert!(failure_hint(&upload(429)).is_some_and(|hint| hint.contains("--upload-concurrency")));
        assert_eq!(failure_hint(&upload(400)), None);
        assert_eq!(
            failure_hint(&TranscribeError::RemoteJob {
                message: "bad audio".to_string()
            }),
            None
        );
    }

    #[test]
    fn invalid_options_are_caught_early() {
        let options = TranscribeOptions {
            audio_start_from: Some(5000),
            audio_end_at: Some(1000),
            ..Default::default()
        };
        assert!(!validate_options(&options, &Presenter::new()));
        assert!(validate_options(&TranscribeOptions::default(), &Presenter::new()));
    }
}

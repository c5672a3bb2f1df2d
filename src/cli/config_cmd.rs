//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::{ConfigError, InvalidFormatError, InvalidSpeechModelError};
use crate::domain::transcription::{OutputFormat, SpeechModel};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";
const BOOL_HINT: &str = "Value must be 'true' or 'false'";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    let shown = display_value(&config, key).unwrap_or_default();
    presenter.success(&format!("{} = {}", key, shown));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    match display_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(
            key,
            display_value(&config, key).as_deref().unwrap_or(NOT_SET),
        );
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Validate `value` for `key` and store it
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "api_key" => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
            config.api_key = Some(trimmed.to_string());
        }
        "format" => {
            let format: OutputFormat = value
                .parse()
                .map_err(|e: InvalidFormatError| invalid(e.to_string()))?;
            config.format = Some(format.to_string());
        }
        "speech_model" => {
            let model: SpeechModel = value
                .parse()
                .map_err(|e: InvalidSpeechModelError| invalid(e.to_string()))?;
            config.speech_model = Some(model.to_string());
        }
        "speaker_labels" => {
            config.speaker_labels =
                Some(parse_bool(value).map_err(|_| invalid(BOOL_HINT.to_string()))?)
        }
        "language_detection" => {
            config.language_detection =
                Some(parse_bool(value).map_err(|_| invalid(BOOL_HINT.to_string()))?)
        }
        "upload_concurrency" => {
            config.upload_concurrency = Some(parse_concurrency(value).map_err(invalid)?)
        }
        "processing_concurrency" => {
            config.processing_concurrency = Some(parse_concurrency(value).map_err(invalid)?)
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

/// Current value of `key` for display; the API key is masked
fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_key" => config.api_key.as_deref().map(mask_api_key),
        "format" => config.format.clone(),
        "speech_model" => config.speech_model.clone(),
        "speaker_labels" => config.speaker_labels.map(|b| b.to_string()),
        "language_detection" => config.language_detection.map(|b| b.to_string()),
        "upload_concurrency" => config.upload_concurrency.map(|n| n.to_string()),
        "processing_concurrency" => config.processing_concurrency.map(|n| n.to_string()),
        _ => None,
    }
}

fn parse_concurrency(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err("Value must be a positive integer".to_string()),
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

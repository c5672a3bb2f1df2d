//! TOML config file under the XDG config directory

use std::fmt::Display;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, DEFAULT_PROCESSING_CONCURRENCY, DEFAULT_UPLOAD_CONCURRENCY};
use crate::domain::error::ConfigError;
use crate::domain::transcription::ALL_FORMATS;

/// Directory name under the XDG config dir
pub const APP_DIR: &str = "assemblyai-tool";

const FILE_NAME: &str = "config.toml";

/// Config file holding per-user defaults for every command.
///
/// The file may contain the API key, so it is written owner-only on unix.
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// Store at `$XDG_CONFIG_HOME/assemblyai-tool/config.toml`
    pub fn new() -> Self {
        Self::with_path(default_location())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Prefix an error with the file it concerns
    fn at(&self, error: impl Display) -> String {
        format!("{}: {}", self.path.display(), error)
    }

    /// Replace the file contents in one step
    async fn write_file(&self, content: &str) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(self.at(e)))?;
        }

        let staged = self.path.with_extension("toml.tmp");
        fs::write(&staged, content)
            .await
            .map_err(|e| ConfigError::WriteError(self.at(e)))?;
        restrict_to_owner(&staged).await;
        fs::rename(&staged, &self.path)
            .await
            .map_err(|e| ConfigError::WriteError(self.at(e)))?;

        tracing::debug!(path = %self.path.display(), "config written");
        Ok(())
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn default_location() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(APP_DIR)
        .join(FILE_NAME)
}

fn parse(content: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(unix)]
async fn restrict_to_owner(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await {
        tracing::warn!(path = %path.display(), error = %e, "could not restrict config permissions");
    }
}

#[cfg(not(unix))]
async fn restrict_to_owner(_path: &Path) {}

/// Starter file written by `config init`: every key, with the defaults filled in
fn template() -> String {
    let defaults = AppConfig::defaults();
    let formats: Vec<&str> = ALL_FORMATS.iter().map(|f| f.as_str()).collect();

    format!(
        r#"# aait configuration. Command-line flags override these values.

# AssemblyAI API key. ASSEMBLY_AI_KEY and .env files take precedence.
# api_key = "your-api-key"

# Output format: {formats}
format = "{format}"

# Speech model used for new transcriptions
speech_model = "{model}"

speaker_labels = {speaker_labels}
language_detection = {language_detection}

# Batch mode: files uploading at the same time
upload_concurrency = {upload}

# Batch mode: remote jobs processing at the same time
processing_concurrency = {processing}
"#,
        formats = formats.join(", "),
        format = defaults.format_or_default(),
        model = defaults.speech_model_or_default(),
        speaker_labels = defaults.speaker_labels_or_default(),
        language_detection = defaults.language_detection_or_default(),
        upload = DEFAULT_UPLOAD_CONCURRENCY,
        processing = DEFAULT_PROCESSING_CONCURRENCY,
    )
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.exists() {
            tracing::debug!(path = %self.path.display(), "no config file");
            return Ok(AppConfig::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(self.at(e)))?;
        let config = parse(&content).map_err(|e| ConfigError::ParseError(self.at(e)))?;

        tracing::debug!(path = %self.path.display(), "config loaded");
        Ok(config)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(self.at(e)))?;
        self.write_file(&content).await
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }
        self.write_file(&template()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_location_is_under_app_dir() {
        let path = XdgConfigStore::new().path();
        assert!(path.to_string_lossy().contains(APP_DIR));
        assert!(path.ends_with(FILE_NAME));
    }

    #[test]
    fn parses_flat_keys() {
        let config = parse(
            r#"
api_key = "test-key"
format = "srt"
speaker_labels = false
upload_concurrency = 2
"#,
        )
        .unwrap();
        assert_eq!(config.api_key, Some("test-key".to_string()));
        assert_eq!(config.format, Some("srt".to_string()));
        assert_eq!(config.speaker_labels, Some(false));
        assert_eq!(config.upload_concurrency, Some(2));
        assert!(config.processing_concurrency.is_none());
    }

    #[test]
    fn template_parses_back_to_defaults() {
        let text = template();
        assert_eq!(parse(&text).unwrap(), AppConfig::defaults());
        assert!(text.contains(&format!("upload_concurrency = {}", DEFAULT_UPLOAD_CONCURRENCY)));
        assert!(text.contains(&format!(
            "processing_concurrency = {}",
            DEFAULT_PROCESSING_CONCURRENCY
        )));
        assert!(text.contains("# api_key"));
        assert!(text.contains("json"));
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        assert_eq!(store.load().await.unwrap(), AppConfig::empty());
    }

    #[tokio::test]
    async fn malformed_file_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "upload_concurrency = \"many\"").unwrap();

        let err = XdgConfigStore::with_path(&path).load().await.unwrap_err();
        match err {
            ConfigError::ParseError(message) => {
                assert!(message.contains(&path.display().to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn init_writes_commented_template_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("nested/config.toml"));

        store.init().await.unwrap();
        let written = std::fs::read_to_string(store.path()).unwrap();
        assert!(written.lines().any(|line| line.starts_with('#')));
        assert!(written.contains("upload_concurrency"));
        assert_eq!(store.load().await.unwrap(), AppConfig::defaults());

        let err = store.init().await.unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn save_round_trips_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let config = AppConfig {
            api_key: Some("k".to_string()),
            processing_concurrency: Some(3),
            ..Default::default()
        };

        store.save(&config).await.unwrap();
        assert_eq!(store.load().await.unwrap(), config);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        store.save(&AppConfig::defaults()).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

//! API key lookup across the environment, `.env` files and the config file

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable (and `.env` key) holding the API key
pub const API_KEY_VAR: &str = "ASSEMBLY_AI_KEY";

/// Per-user env file, relative to the home directory
pub const HOME_ENV_FILE: &str = ".assemblyai-tool.env";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error(
        "No API key found. Set ASSEMBLY_AI_KEY, add it to ./.env or ~/.assemblyai-tool.env, \
         or run 'aait config set api_key <key>'"
    )]
    Missing,
}

/// Where a key was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    EnvFile(PathBuf),
    ConfigFile,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::EnvFile(path) => write!(f, "{}", path.display()),
            Self::ConfigFile => write!(f, "config file"),
        }
    }
}

/// Resolves the API key from an ordered list of sources; the first non-empty one wins.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyResolver {
    env_value: Option<String>,
    env_files: Vec<PathBuf>,
    config_key: Option<String>,
}

impl ApiKeyResolver {
    /// Resolver with no sources
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard lookup: `$ASSEMBLY_AI_KEY`, `./.env`, `~/.assemblyai-tool.env`, then the config file
    pub fn standard(config_key: Option<String>) -> Self {
        let mut resolver = Self::new()
            .with_env_value(env::var(API_KEY_VAR).ok())
            .with_env_file(".env");
        if let Some(home) = dirs::home_dir() {
            resolver = resolver.with_env_file(home.join(HOME_ENV_FILE));
        }
        resolver.with_config_key(config_key)
    }

    pub fn with_env_value(mut self, value: Option<String>) -> Self {
        self.env_value = value;
        self
    }

    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_files.push(path.into());
        self
    }

    pub fn with_config_key(mut self, key: Option<String>) -> Self {
        self.config_key = key;
        self
    }

    /// Find the key and the source it came from
    pub fn resolve(&self) -> Result<(String, CredentialSource), CredentialError> {
        if let Some(key) = non_empty(self.env_value.as_deref()) {
            return Ok((key, CredentialSource::Environment));
        }

        for path in &self.env_files {
            if let Some(key) = read_env_file(path) {
                return Ok((key, CredentialSource::EnvFile(path.clone())));
            }
        }

        if let Some(key) = non_empty(self.config_key.as_deref()) {
            return Ok((key, CredentialSource::ConfigFile));
        }

        Err(CredentialError::Missing)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Look up the key in one env file without touching the process environment
fn read_env_file(path: &Path) -> Option<String> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read env file");
            return None;
        }
    };

    for entry in entries {
        match entry {
            Ok((name, value)) if name == API_KEY_VAR => return non_empty(Some(&value)),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed env file");
                return None;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn environment_wins() {
        let dir = tempfile::tempdir().unwrap();
        let file = env_file(dir.path(), ".env", "ASSEMBLY_AI_KEY=from-file\n");

        let (key, source) = ApiKeyResolver::new()
            .with_env_value(Some("from-env".to_string()))
            .with_env_file(file)
            .resolve()
            .unwrap();
        assert_eq!(key, "from-env");
        assert_eq!(source, CredentialSource::Environment);
    }

    #[test]
    fn blank_environment_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let file = env_file(dir.path(), ".env", "OTHER=1\nASSEMBLY_AI_KEY=\"quoted key\"\n");

        let (key, source) = ApiKeyResolver::new()
            .with_env_value(Some("   ".to_string()))
            .with_env_file(&file)
            .resolve()
            .unwrap();
        assert_eq!(key, "quoted key");
        assert_eq!(source, CredentialSource::EnvFile(file));
    }

    #[test]
    fn env_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let local = env_file(dir.path(), "local.env", "UNRELATED=x\n");
        let home = env_file(dir.path(), "home.env", "ASSEMBLY_AI_KEY=home-key\n");

        let (key, source) = ApiKeyResolver::new()
            .with_env_file(dir.path().join("missing.env"))
            .with_env_file(local)
            .with_env_file(&home)
            .with_config_key(Some("config-key".to_string()))
            .resolve()
            .unwrap();
        assert_eq!(key, "home-key");
        assert_eq!(source, CredentialSource::EnvFile(home));
    }

    #[test]
    fn config_key_is_last_resort() {
        let (key, source) = ApiKeyResolver::new()
            .with_config_key(Some("config-key".to_string()))
            .resolve()
            .unwrap();
        assert_eq!(key, "config-key");
        assert_eq!(source, CredentialSource::ConfigFile);
    }

    #[test]
    fn nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ApiKeyResolver::new()
            .with_env_file(dir.path().join(".env"))
            .resolve()
            .unwrap_err();
        assert_eq!(err, CredentialError::Missing);
        assert!(err.to_string().contains("ASSEMBLY_AI_KEY"));
    }
}

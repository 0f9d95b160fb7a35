//! Configuration file management for Kaiwa.
//!
//! Supports reading secrets from `~/.config/kaiwa/secret.json`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while resolving the API credential.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHome,
    #[error("configuration file not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read configuration file at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse configuration file at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("OPENAI_API_KEY not found in ~/.config/kaiwa/secret.json or environment variables")]
    MissingApiKey,
}

/// Root structure for secret.json
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<OpenAiConfig>,
}

/// OpenAI API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Loads the secret configuration file from ~/.config/kaiwa/secret.json
pub fn load_secret_config() -> Result<SecretConfig, ConfigError> {
    load_from_path(&config_path()?)
}

/// Loads a secret configuration file from an explicit path.
pub fn load_from_path(path: &Path) -> Result<SecretConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the path to the configuration file: ~/.config/kaiwa/secret.json
fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
    Ok(home.join(".config").join("kaiwa").join("secret.json"))
}

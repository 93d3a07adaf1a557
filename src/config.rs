//! Application configuration.
//!
//! Configuration is stored as YAML and includes:
//! - The admin API base URL
//! - The request timeout
//!
//! The file location is resolved from an explicit `--config` path, then
//! `HEARTFLOW_ADMIN_CONFIG`, then the platform config directory. The base URL
//! can always be overridden with `HEARTFLOW_API_BASE_URL`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AdminError, Result};

pub const CONFIG_PATH_ENV: &str = "HEARTFLOW_ADMIN_CONFIG";
pub const BASE_URL_ENV: &str = "HEARTFLOW_API_BASE_URL";

/// Keys accepted by `config set`
pub const VALID_KEYS: &[&str] = &["api.base_url", "api.timeout"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base address of the admin API, e.g. `https://detect.example.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: default_timeout(),
        }
    }
}

impl Config {
    /// Resolve the config file path.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }

        if let Ok(path) = env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        ProjectDirs::from("com", "heartflow", "heartflow-admin")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .ok_or_else(|| {
                AdminError::Config(format!(
                    "could not determine a config directory; pass --config or set {CONFIG_PATH_ENV}"
                ))
            })
    }

    /// Load configuration from file, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AdminError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                AdminError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            AdminError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;
        Ok(())
    }

    /// Raw base URL from the environment or the config file
    pub fn base_url_raw(&self) -> Option<String> {
        if let Ok(url) = env::var(BASE_URL_ENV)
            && !url.is_empty()
        {
            return Some(url);
        }

        self.api.base_url.clone()
    }

    /// Parsed base URL of the admin API.
    pub fn api_base_url(&self) -> Result<Url> {
        let raw = self.base_url_raw().ok_or_else(|| {
            AdminError::Config(format!(
                "API base URL not configured. Set {BASE_URL_ENV} or run: heartflow-admin config set api.base_url <url>"
            ))
        })?;
        parse_base_url(&raw)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout)
    }

    /// Look up a value by its dotted key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match validate_key(key)? {
            "api.base_url" => Ok(self.api.base_url.clone()),
            "api.timeout" => Ok(Some(self.api.timeout.to_string())),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a value by its dotted key, validating it first.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match validate_key(key)? {
            "api.base_url" => {
                let url = parse_base_url(value)?;
                self.api.base_url = Some(url.to_string());
            }
            "api.timeout" => {
                let seconds = value.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                    AdminError::Config(format!(
                        "invalid value '{value}' for api.timeout. Expected a positive number of seconds"
                    ))
                })?;
                self.api.timeout = seconds;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AdminError::Config(format!("invalid API base URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AdminError::Config(format!(
            "invalid API base URL '{raw}': unsupported scheme '{other}'"
        ))),
    }
}

/// Reject underscore notation for section names, suggesting the dotted form
fn validate_key(key: &str) -> Result<&str> {
    if VALID_KEYS.contains(&key) {
        return Ok(key);
    }

    if let Some(pos) = key.find('_') {
        let dot_version = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        return Err(AdminError::Config(format!(
            "invalid config key '{key}'. Use dot notation: '{dot_version}'"
        )));
    }
    Err(unknown_key(key))
}

fn unknown_key(key: &str) -> AdminError {
    AdminError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_KEYS.join(", ")
    ))
}

//! Portal configuration.
//!
//! Configuration can be loaded from:
//! - TOML files (default: `<config dir>/portal-it/portal.toml`)
//! - Environment variables (`PORTAL_*` prefixed)
//!
//! # Example
//!
//! ```toml
//! [backend]
//! mode = "http"
//! base_url = "http://127.0.0.1:1430"
//! timeout_secs = 10
//! ```
//!
//! `${VAR_NAME}` placeholders in the file are replaced from the environment
//! before parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};

use portal_core::defaults;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid backend mode: {0}")]
    InvalidMode(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for portal_core::Error {
    fn from(err: ConfigError) -> Self {
        portal_core::Error::Config(err.to_string())
    }
}

/// How the portal reaches its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Invoke commands over HTTP on the local backend.
    #[default]
    Http,
    /// Never contact a backend; every read is served from the seed catalog.
    Offline,
}

impl FromStr for BackendMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "offline" => Ok(Self::Offline),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,
    /// Base URL of the command endpoint (http mode only).
    #[serde(default = "BackendConfig::default_base_url")]
    pub base_url: String,
    /// Per-call timeout enforced by the HTTP transport.
    #[serde(default = "BackendConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::default(),
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    fn default_base_url() -> String {
        defaults::BACKEND_URL.to_string()
    }

    fn default_timeout_secs() -> u64 {
        defaults::TIMEOUT_SECS
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.mode == BackendMode::Offline {
            return Ok(());
        }

        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "backend base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "backend base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 || self.timeout_secs > defaults::MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "backend timeout_secs must be between 1 and {}, got: {}",
                defaults::MAX_TIMEOUT_SECS,
                self.timeout_secs
            )));
        }

        Ok(())
    }
}

/// Main portal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub backend: BackendConfig,
}

impl PortalConfig {
    /// Get the default config file path.
    ///
    /// Returns: `<config dir>/portal-it/portal.toml`
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push(defaults::CONFIG_DIR_NAME);
        path.push(defaults::CONFIG_FILE_NAME);
        path
    }

    /// Load configuration from the default path, falling back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        Self::resolve(None, false)
    }

    /// Load configuration from `path` (or the default path, then the
    /// environment), apply the offline override, then validate.
    ///
    /// Validation runs last so an offline override is honored even when the
    /// stored backend URL would not pass.
    pub fn resolve(path: Option<&Path>, offline: bool) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::read_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    info!("Loading portal config from: {}", default_path.display());
                    Self::read_file(&default_path)?
                } else {
                    debug!(
                        "Config file not found at {}, using environment variables",
                        default_path.display()
                    );
                    Self::from_env()?
                }
            }
        };

        let config = if offline { config.offline() } else { config };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let config = Self::parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    fn parse_toml(content: &str) -> ConfigResult<Self> {
        let content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from environment variables.
    ///
    /// - `PORTAL_BACKEND`: `http` or `offline`
    /// - `PORTAL_BACKEND_URL`: command endpoint base URL
    /// - `PORTAL_TIMEOUT_SECS`: per-call timeout
    pub fn from_env() -> ConfigResult<Self> {
        let mode = match env::var("PORTAL_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => BackendMode::default(),
        };

        let base_url =
            env::var("PORTAL_BACKEND_URL").unwrap_or_else(|_| defaults::BACKEND_URL.to_string());

        let timeout_secs = env::var("PORTAL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::TIMEOUT_SECS);

        Ok(Self {
            backend: BackendConfig {
                mode,
                base_url,
                timeout_secs,
            },
        })
    }

    /// Force offline mode regardless of what was loaded.
    pub fn offline(mut self) -> Self {
        self.backend.mode = BackendMode::Offline;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.backend.validate()
    }

    /// Substitute environment variables in the format ${VAR_NAME}.
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| {
            Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
        });
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    DEFAULT_ADMIN_PASSWORD, default_admin_password, default_palette, default_server_name,
};
use super::limits::LimitsConfig;
use super::listen::ListenConfig;
use super::validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Relay configuration.
///
/// Every section is optional; an empty file yields a relay on port 8082.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Relay identity.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Admin credentials.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Per-connection limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Display color palette.
    #[serde(default)]
    pub palette: PaletteConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Load `path`, or fall back to defaults when it does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(&path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    "Config file not found, using defaults"
                );
                Ok(Self::default())
            }
            other => other,
        }
    }
}

/// Relay identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Relay name, shown in log spans.
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

/// Credentials for the reserved admin identity.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Password checked by `adminLogin admin--<password>`.
    #[serde(default = "default_admin_password")]
    pub password: String,
}

impl AdminConfig {
    /// Whether the shipped default password is still in use.
    pub fn is_default_password(&self) -> bool {
        self.password == DEFAULT_ADMIN_PASSWORD
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: default_admin_password(),
        }
    }
}

/// Display color palette configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteConfig {
    /// 256-color codes assigned round robin at registration.
    #[serde(default = "default_palette")]
    pub colors: Vec<u8>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: default_palette(),
        }
    }
}

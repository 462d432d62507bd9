//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading or writing a config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[cfg(feature = "toml")]
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[cfg(feature = "toml")]
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// YAML parsing or serialization error
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension has no matching format, or its feature is disabled
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A field holds a value outside its allowed set
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlitzConfig {
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub registry: RegistryConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `RUST_LOG` nor `--log-level` is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Page database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub namespace: String,
    pub database: String,
    /// On-disk database location; `None` keeps pages in memory for the session
    pub path: Option<PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            namespace: "blitz".to_string(),
            database: "pages".to_string(),
            path: None,
        }
    }
}

/// Component template configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON or YAML file of extra templates
    pub templates_path: Option<PathBuf>,
    /// Register the stock composed components
    pub include_builtin: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            templates_path: None,
            include_builtin: true,
        }
    }
}

impl BlitzConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> ConfigResult<()> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }
        if self.database.namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.namespace".to_string(),
                value: self.database.namespace.clone(),
            });
        }
        if self.database.database.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.database".to_string(),
                value: self.database.database.clone(),
            });
        }
        Ok(())
    }

    /// `<config dir>/blitz/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("blitz").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BlitzConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.namespace, "blitz");
        assert!(config.database.path.is_none());
        assert!(config.registry.include_builtin);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = BlitzConfig::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "logging.level"
        ));

        let mut config = BlitzConfig::default();
        config.database.namespace = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_level_is_case_insensitive() {
        let mut config = BlitzConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }
}

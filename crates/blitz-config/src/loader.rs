//! Loading configuration from files and the environment

use std::path::Path;

use tracing::{debug, info};

use crate::config::{BlitzConfig, ConfigError, ConfigResult};

/// Environment variables that override file values
pub const ENV_LOG_LEVEL: &str = "BLITZ_LOG_LEVEL";
pub const ENV_DB_PATH: &str = "BLITZ_DB_PATH";
pub const ENV_DB_NAMESPACE: &str = "BLITZ_DB_NAMESPACE";
pub const ENV_DB_DATABASE: &str = "BLITZ_DB_DATABASE";
pub const ENV_TEMPLATES: &str = "BLITZ_TEMPLATES";

/// Serialization format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Reads [`BlitzConfig`] from disk
pub struct ConfigLoader;

impl ConfigLoader {
    /// Decode configuration text in the given format
    pub fn parse(content: &str, format: ConfigFormat) -> ConfigResult<BlitzConfig> {
        let config: BlitzConfig = match format {
            #[cfg(feature = "toml")]
            ConfigFormat::Toml => toml::from_str(content)?,
            #[cfg(feature = "yaml")]
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
            #[allow(unreachable_patterns)]
            other => return Err(ConfigError::UnsupportedFormat(format!("{:?}", other))),
        };
        config.validate()?;
        Ok(config)
    }

    /// Encode configuration in the given format
    pub fn render(config: &BlitzConfig, format: ConfigFormat) -> ConfigResult<String> {
        match format {
            #[cfg(feature = "toml")]
            ConfigFormat::Toml => Ok(toml::to_string_pretty(config)?),
            #[cfg(feature = "yaml")]
            ConfigFormat::Yaml => Ok(serde_yaml::to_string(config)?),
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            #[allow(unreachable_patterns)]
            other => Err(ConfigError::UnsupportedFormat(format!("{:?}", other))),
        }
    }

    pub async fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<BlitzConfig> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = tokio::fs::read_to_string(path).await?;
        debug!(path = %path.display(), "loaded config file");
        Self::parse(&content, format)
    }

    /// Load synchronously (for non-async contexts)
    pub fn load_from_file_sync(path: impl AsRef<Path>) -> ConfigResult<BlitzConfig> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded config file");
        Self::parse(&content, format)
    }

    /// Load the explicit file, else the default location if it exists, else defaults.
    ///
    /// Environment overrides are applied last.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<BlitzConfig> {
        let mut config = match path {
            Some(path) => Self::load_from_file_sync(path)?,
            None => match BlitzConfig::default_path().filter(|p| p.exists()) {
                Some(default) => Self::load_from_file_sync(&default)?,
                None => {
                    debug!("no config file found, using defaults");
                    BlitzConfig::default()
                }
            },
        };
        apply_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub async fn save(config: &BlitzConfig, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = Self::render(config, ConfigFormat::from_path(path)?)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        info!(path = %path.display(), "config saved");
        Ok(())
    }
}

/// Apply `BLITZ_*` overrides read through `lookup`
pub fn apply_overrides<F>(config: &mut BlitzConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        debug!(level = %level, "log level overridden from environment");
        config.logging.level = level;
    }
    if let Some(path) = lookup(ENV_DB_PATH) {
        config.database.path = Some(path.into());
    }
    if let Some(namespace) = lookup(ENV_DB_NAMESPACE) {
        config.database.namespace = namespace;
    }
    if let Some(database) = lookup(ENV_DB_DATABASE) {
        config.database.database = database;
    }
    if let Some(templates) = lookup(ENV_TEMPLATES) {
        config.registry.templates_path = Some(templates.into());
    }
    config.validate()
}

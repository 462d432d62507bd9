//! Configuration as seen by the CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use blitz_config::{BlitzConfig, ConfigLoader};
use blitz_core::{PageStore, RegistryBuilder, TemplateRegistry};
use blitz_surrealdb::{SurrealClient, SurrealDbConfig, SurrealPageStore, MEMORY_PATH};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub blitz: BlitzConfig,
}

impl CliConfig {
    /// Load from the given file, the default location, or defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let blitz = ConfigLoader::load_or_default(path.as_deref()).with_context(|| match &path {
            Some(path) => format!("Failed to load config from {}", path.display()),
            None => "Failed to load config".to_string(),
        })?;
        Ok(Self { blitz })
    }

    /// Template registry from the builtin set and the configured template file
    pub fn registry(&self) -> Result<TemplateRegistry> {
        let registry = &self.blitz.registry;
        let mut builder = TemplateRegistry::builder();
        if registry.include_builtin {
            builder = builder.with_builtin();
        }
        if let Some(path) = &registry.templates_path {
            builder = builder
                .with_file(path)
                .with_context(|| format!("Failed to load templates from {}", path.display()))?;
            debug!(path = %path.display(), "templates loaded");
        }
        Ok(builder.build())
    }

    pub fn surreal_config(&self) -> SurrealDbConfig {
        let database = &self.blitz.database;
        SurrealDbConfig {
            namespace: database.namespace.clone(),
            database: database.database.clone(),
            path: database
                .path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| MEMORY_PATH.to_string()),
        }
    }

    /// Caveat about where pages live, printed by the database commands
    pub fn storage_note(&self) -> Option<String> {
        match &self.blitz.database.path {
            None => Some(
                "no database path configured; pages are kept in memory for this run only"
                    .to_string(),
            ),
            Some(path) if !cfg!(feature = "rocksdb") => Some(format!(
                "database path {} needs a build with the rocksdb feature",
                path.display()
            )),
            Some(_) => None,
        }
    }

    /// Connect to the configured page database and make sure its schema exists
    pub async fn page_store(&self) -> Result<SurrealPageStore> {
        let config = self.surreal_config();
        let client = SurrealClient::new(config.clone())
            .await
            .with_context(|| format!("Failed to open page database at {}", config.path))?;
        let store = SurrealPageStore::new(client);
        store
            .initialize()
            .await
            .context("Failed to initialize page schema")?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blitz_core::Registry;

    #[test]
    fn test_registry_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates.yaml");
        std::fs::write(
            &templates,
            "comp-greeting:\n  id: comp-greeting\n  type: title\n  value: Hello\n",
        )
        .unwrap();

        let mut config = CliConfig::default();
        config.blitz.registry.templates_path = Some(templates);
        let registry = config.registry().unwrap();
        assert_eq!(registry.ids(), ["comp-address", "comp-fName", "comp-greeting"]);

        config.blitz.registry.include_builtin = false;
        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_template_file_is_an_error() {
        let mut config = CliConfig::default();
        config.blitz.registry.templates_path = Some(PathBuf::from("/nonexistent/templates.json"));
        let err = config.registry().unwrap_err();
        assert!(err.to_string().contains("Failed to load templates"));
    }

    #[test]
    fn test_surreal_config_defaults_to_memory() {
        let config = CliConfig::default();
        let surreal = config.surreal_config();
        assert_eq!(surreal.path, MEMORY_PATH);
        assert_eq!(surreal.namespace, "blitz");

        let mut config = CliConfig::default();
        config.blitz.database.path = Some(PathBuf::from("/var/lib/blitz"));
        assert_eq!(config.surreal_config().path, "/var/lib/blitz");
    }

    #[test]
    fn test_storage_note() {
        let config = CliConfig::default();
        assert!(config
            .storage_note()
            .unwrap()
            .contains("kept in memory for this run only"));

        let mut config = CliConfig::default();
        config.blitz.database.path = Some(PathBuf::from("/var/lib/blitz"));
        if cfg!(feature = "rocksdb") {
            assert_eq!(config.storage_note(), None);
        } else {
            assert!(config.storage_note().unwrap().contains("rocksdb feature"));
        }
    }
}

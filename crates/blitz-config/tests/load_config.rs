//! Loading configuration files from disk

use std::path::PathBuf;

use blitz_config::{BlitzConfig, ConfigError, ConfigLoader};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn loads_each_format() {
    let dir = TempDir::new().unwrap();

    let toml = write(
        &dir,
        "config.toml",
        "[logging]\nlevel = \"debug\"\n\n[registry]\ninclude_builtin = false\n",
    );
    let config = ConfigLoader::load_from_file(&toml).await.unwrap();
    assert_eq!(config.logging.level, "debug");
    assert!(!config.registry.include_builtin);

    let yaml = write(
        &dir,
        "config.yaml",
        "database:\n  namespace: editor\n  path: /var/lib/blitz\n",
    );
    let config = ConfigLoader::load_from_file(&yaml).await.unwrap();
    assert_eq!(config.database.namespace, "editor");
    assert_eq!(config.database.path, Some(PathBuf::from("/var/lib/blitz")));

    let json = write(&dir, "config.json", r#"{"registry": {"templates_path": "t.json"}}"#);
    let config = ConfigLoader::load_from_file_sync(&json).unwrap();
    assert_eq!(config.registry.templates_path, Some(PathBuf::from("t.json")));
    assert!(config.registry.include_builtin);
}

#[tokio::test]
async fn save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = BlitzConfig::default();
    config.logging.level = "warn".to_string();
    config.database.path = Some(PathBuf::from("/tmp/blitz.db"));

    ConfigLoader::save(&config, &path).await.unwrap();
    let loaded = ConfigLoader::load_from_file(&path).await.unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::load_or_default(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.toml", "[logging\nlevel = 3");
    assert!(matches!(
        ConfigLoader::load_from_file_sync(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

//! Configuration and error types for the SurrealDB backend

use blitz_core::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// In-memory marker accepted in [`SurrealDbConfig::path`]
pub const MEMORY_PATH: &str = ":memory:";

/// Configuration for the SurrealDB backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurrealDbConfig {
    pub namespace: String,
    pub database: String,
    /// RocksDB directory, or empty / `:memory:` for the in-memory engine
    pub path: String,
}

impl Default for SurrealDbConfig {
    fn default() -> Self {
        Self {
            namespace: "blitz".to_string(),
            database: "pages".to_string(),
            path: MEMORY_PATH.to_string(),
        }
    }
}

impl SurrealDbConfig {
    pub fn is_memory(&self) -> bool {
        self.path.is_empty() || self.path == MEMORY_PATH
    }
}

/// Database errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Connection(msg) => StoreError::Connection(msg),
            DbError::Query(msg) | DbError::Schema(msg) => StoreError::Query(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_map_to_store_errors() {
        assert!(matches!(
            StoreError::from(DbError::Connection("down".into())),
            StoreError::Connection(msg) if msg == "down"
        ));
        assert!(matches!(
            StoreError::from(DbError::Schema("bad index".into())),
            StoreError::Query(msg) if msg == "bad index"
        ));
    }

    #[test]
    fn test_memory_path_detection() {
        assert!(SurrealDbConfig::default().is_memory());
        let on_disk = SurrealDbConfig {
            path: "/var/lib/blitz".to_string(),
            ..SurrealDbConfig::default()
        };
        assert!(!on_disk.is_memory());
    }
}

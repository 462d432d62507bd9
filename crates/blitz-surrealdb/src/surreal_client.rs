//! Thin wrapper around the SurrealDB Rust SDK
//!
//! ## Supported Backends
//!
//! - **Memory (Mem)**: In-memory storage for development and testing
//! - **File (RocksDB)**: Persistent storage, with the `rocksdb` feature
//!
//! ```no_run
//! use blitz_surrealdb::SurrealClient;
//!
//! # async fn example() -> Result<(), blitz_surrealdb::DbError> {
//! let client = SurrealClient::new_memory().await?;
//! client.execute("INFO FOR DB", Vec::new()).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{Response, Surreal};
use tracing::debug;

use crate::types::{DbError, DbResult, SurrealDbConfig};

/// A named query parameter
pub type Binding = (String, serde_json::Value);

/// SurrealDB client
///
/// Cloning is cheap and shares the connection, so a file database is never
/// opened twice by the same process.
#[derive(Clone)]
pub struct SurrealClient {
    inner: Arc<SurrealClientInner>,
}

struct SurrealClientInner {
    db: Surreal<Db>,
    config: SurrealDbConfig,
}

impl std::fmt::Debug for SurrealClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrealClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

impl SurrealClient {
    /// Open the database described by `config` and select its namespace and database
    pub async fn new(config: SurrealDbConfig) -> DbResult<Self> {
        let db = if config.is_memory() {
            use surrealdb::engine::local::Mem;

            Surreal::new::<Mem>(()).await.map_err(|e| {
                DbError::Connection(format!("Failed to create in-memory database: {}", e))
            })?
        } else {
            Self::open_file(&config.path).await?
        };

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                DbError::Connection(format!(
                    "Failed to use namespace '{}' and database '{}': {}",
                    config.namespace, config.database, e
                ))
            })?;

        debug!(
            namespace = %config.namespace,
            database = %config.database,
            memory = config.is_memory(),
            "connected to SurrealDB"
        );
        Ok(Self {
            inner: Arc::new(SurrealClientInner { db, config }),
        })
    }

    #[cfg(feature = "rocksdb")]
    async fn open_file(path: &str) -> DbResult<Surreal<Db>> {
        use surrealdb::engine::local::RocksDb;

        Surreal::new::<RocksDb>(path).await.map_err(|e| {
            DbError::Connection(format!("Failed to create file database at {}: {}", path, e))
        })
    }

    #[cfg(not(feature = "rocksdb"))]
    async fn open_file(path: &str) -> DbResult<Surreal<Db>> {
        Err(DbError::Connection(format!(
            "cannot open {}: built without the rocksdb feature",
            path
        )))
    }

    /// In-memory client with the default namespace and database
    pub async fn new_memory() -> DbResult<Self> {
        Self::new(SurrealDbConfig::default()).await
    }

    /// In-memory client in a namespace of its own, for tests running in parallel
    pub async fn new_isolated_memory() -> DbResult<Self> {
        let config = SurrealDbConfig {
            namespace: format!("test_{}", uuid::Uuid::new_v4().simple()),
            ..SurrealDbConfig::default()
        };
        Self::new(config).await
    }

    pub fn config(&self) -> &SurrealDbConfig {
        &self.inner.config
    }

    /// Run a SurrealQL script and fail if any statement failed
    pub async fn execute(&self, sql: &str, bindings: Vec<Binding>) -> DbResult<Response> {
        let query = bindings
            .into_iter()
            .fold(self.inner.db.query(sql), |query, binding| query.bind(binding));

        let response = query
            .await
            .map_err(|e| DbError::Query(format!("Query execution failed: {}", e)))?;
        response
            .check()
            .map_err(|e| DbError::Query(format!("Query returned error: {}", e)))
    }

    /// Run a single-statement query and decode its rows
    pub async fn query_rows<T>(&self, sql: &str, bindings: Vec<Binding>) -> DbResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut response = self.execute(sql, bindings).await?;
        take_rows(&mut response, 0)
    }
}

/// Decode the rows of statement `index` of a response
pub fn take_rows<T>(response: &mut Response, index: usize) -> DbResult<Vec<T>>
where
    T: DeserializeOwned,
{
    response
        .take(index)
        .map_err(|e| DbError::Query(format!("Failed to extract query results: {}", e)))
}

/// Build a binding from any serializable value
pub fn bind(name: impl Into<String>, value: impl Serialize) -> DbResult<Binding> {
    let value = serde_json::to_value(value)
        .map_err(|e| DbError::Query(format!("Failed to encode parameter: {}", e)))?;
    Ok((name.into(), value))
}

//! # Blitz SurrealDB Backend
//!
//! Persists page trees in SurrealDB. Every node becomes a record in the
//! table of its kind (`frame`, `layout`, `element`) and every parent/child
//! link a `children` graph edge carrying the child's position.
//!
//! ```rust,no_run
//! use blitz_core::{Node, PageStore};
//! use blitz_surrealdb::SurrealPageStore;
//!
//! # async fn example() -> Result<(), blitz_core::StoreError> {
//! let store = SurrealPageStore::new_memory().await?;
//! let record = store.insert_page(&Node::page("page0", "Page 1", [])).await?;
//! let loaded = store.get_page(record.uid).await?;
//! # Ok(())
//! # }
//! ```

pub mod page_store;
pub mod schema;
pub mod surreal_client;
pub mod types;

pub use page_store::SurrealPageStore;
pub use surreal_client::SurrealClient;
pub use types::{DbError, DbResult, SurrealDbConfig, MEMORY_PATH};

//! Page persistence abstraction
//!
//! [`PageStore`] is the seam between the editor and a database. Backends
//! receive whole page trees; how they lay them out is their own business.
//! [`InMemoryPageStore`] keeps pages in a map and backs tests and the CLI
//! when no database is configured.

pub mod error;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::tree::{Node, NodeKind};

pub use error::{StoreError, StoreResult};

/// A stored page and the uid it was assigned on insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub uid: Uuid,
    pub page: Node,
}

/// Persistence backend for page trees
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Prepare schema or connections; safe to call more than once
    async fn initialize(&self) -> StoreResult<()>;

    /// Store a page tree under a fresh uid
    async fn insert_page(&self, page: &Node) -> StoreResult<PageRecord>;

    async fn get_page(&self, uid: Uuid) -> StoreResult<Option<PageRecord>>;

    /// Every stored page, unfiltered
    async fn list_pages(&self) -> StoreResult<Vec<PageRecord>>;

    /// Returns whether a page was removed
    async fn delete_page(&self, uid: Uuid) -> StoreResult<bool>;
}

/// Reject anything that is not a valid page tree
pub fn check_page(page: &Node) -> StoreResult<()> {
    if page.kind() != NodeKind::Page {
        return Err(StoreError::InvalidPage(format!(
            "expected a page, found {}",
            page.kind()
        )));
    }
    page.validate()
        .map_err(|err| StoreError::InvalidPage(err.to_string()))
}

/// Map-backed page store
#[derive(Debug, Clone, Default)]
pub struct InMemoryPageStore {
    pages: Arc<RwLock<HashMap<Uuid, Node>>>,
    // Insertion order, so listings are stable
    order: Arc<RwLock<Vec<Uuid>>>,
}

impl InMemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.read().is_empty()
    }
}

#[async_trait]
impl PageStore for InMemoryPageStore {
    async fn initialize(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_page(&self, page: &Node) -> StoreResult<PageRecord> {
        check_page(page)?;
        let uid = Uuid::new_v4();
        self.pages.write().insert(uid, page.clone());
        self.order.write().push(uid);
        debug!(uid = %uid, page = page.id(), "page stored in memory");
        Ok(PageRecord {
            uid,
            page: page.clone(),
        })
    }

    async fn get_page(&self, uid: Uuid) -> StoreResult<Option<PageRecord>> {
        Ok(self.pages.read().get(&uid).map(|page| PageRecord {
            uid,
            page: page.clone(),
        }))
    }

    async fn list_pages(&self) -> StoreResult<Vec<PageRecord>> {
        let pages = self.pages.read();
        Ok(self
            .order
            .read()
            .iter()
            .filter_map(|uid| {
                pages.get(uid).map(|page| PageRecord {
                    uid: *uid,
                    page: page.clone(),
                })
            })
            .collect())
    }

    async fn delete_page(&self, uid: Uuid) -> StoreResult<bool> {
        let removed = self.pages.write().remove(&uid).is_some();
        if removed {
            self.order.write().retain(|u| *u != uid);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str) -> Node {
        Node::page(id, "Page", [Node::title("child0", "Hello")])
    }

    #[tokio::test]
    async fn test_insert_get_list_delete() {
        let store = InMemoryPageStore::new();
        store.initialize().await.unwrap();

        let first = store.insert_page(&page("page0")).await.unwrap();
        let second = store.insert_page(&page("page1")).await.unwrap();
        assert_ne!(first.uid, second.uid);

        let fetched = store.get_page(first.uid).await.unwrap().unwrap();
        assert_eq!(fetched, first);

        let listed = store.list_pages().await.unwrap();
        assert_eq!(listed, vec![first.clone(), second]);

        assert!(store.delete_page(first.uid).await.unwrap());
        assert!(!store.delete_page(first.uid).await.unwrap());
        assert!(store.get_page(first.uid).await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = InMemoryPageStore::new();
        for id in ["b", "a", "c"] {
            store.insert_page(&page(id)).await.unwrap();
        }
        let ids: Vec<String> = store
            .list_pages()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.page.id().to_string())
            .collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_rejects_non_pages() {
        let store = InMemoryPageStore::new();
        let err = store.insert_page(&Node::title("t", "x")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidPage(_)));
        assert!(store.is_empty());
    }
}

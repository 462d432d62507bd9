//! [`PageStore`] backed by SurrealDB

use async_trait::async_trait;
use blitz_core::storage::check_page;
use blitz_core::{Node, PageRecord, PageStore, StoreError, StoreResult};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::schema::{assemble, EdgeRow, NodeRow, PagePlan, CHILDREN_EDGE, SCHEMA};
use crate::surreal_client::{bind, take_rows, SurrealClient};
use crate::types::DbError;

const NODE_FIELDS: &str =
    "uid, page, node_id, kind, title, display_type, value, label, variable, input_type, options, ref_id";

#[derive(Debug, Deserialize)]
struct UidRow {
    uid: String,
}

/// Stores each page as node records joined by `children` edges
#[derive(Debug, Clone)]
pub struct SurrealPageStore {
    client: SurrealClient,
}

impl SurrealPageStore {
    pub fn new(client: SurrealClient) -> Self {
        Self { client }
    }

    /// In-memory store with its schema in place
    pub async fn new_memory() -> StoreResult<Self> {
        let store = Self::new(SurrealClient::new_memory().await?);
        store.initialize().await?;
        Ok(store)
    }

    pub fn client(&self) -> &SurrealClient {
        &self.client
    }

    /// Script writing every node and edge of a page in one transaction
    fn insert_script(plan: &PagePlan) -> String {
        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for (i, node) in plan.nodes.iter().enumerate() {
            sql.push_str(&format!(
                "CREATE {}:⟨{}⟩ CONTENT $n{};\n",
                node.table, node.row.uid, i
            ));
        }
        for &(parent, child, position) in &plan.edges {
            let parent = &plan.nodes[parent];
            let child = &plan.nodes[child];
            sql.push_str(&format!(
                "RELATE {}:⟨{}⟩->{}->{}:⟨{}⟩ SET position = {}, page = $page;\n",
                parent.table, parent.row.uid, CHILDREN_EDGE, child.table, child.row.uid, position
            ));
        }
        sql.push_str("COMMIT TRANSACTION;\n");
        sql
    }

    async fn load(&self, uid: Uuid) -> StoreResult<Option<Node>> {
        let page = uid.to_string();
        let sql = format!(
            "SELECT {fields} FROM frame WHERE page = $page;
             SELECT {fields} FROM layout WHERE page = $page;
             SELECT {fields} FROM element WHERE page = $page;
             SELECT in.uid AS parent, out.uid AS child, position FROM children WHERE page = $page;",
            fields = NODE_FIELDS
        );
        let mut response = self
            .client
            .execute(&sql, vec![bind("page", &page)?])
            .await?;

        // Nested pages share the `frame` table with the root
        let mut rows: Vec<NodeRow> = take_rows(&mut response, 0)?;
        if !rows.iter().any(|row| row.uid == page) {
            return Ok(None);
        }
        rows.extend(take_rows::<NodeRow>(&mut response, 1)?);
        rows.extend(take_rows::<NodeRow>(&mut response, 2)?);
        let edges: Vec<EdgeRow> = take_rows(&mut response, 3)?;

        debug!(page = %page, records = rows.len(), edges = edges.len(), "page records loaded");
        assemble(&page, &rows, &edges).map(Some)
    }
}

#[async_trait]
impl PageStore for SurrealPageStore {
    async fn initialize(&self) -> StoreResult<()> {
        self.client
            .execute(SCHEMA, Vec::new())
            .await
            .map_err(|e| DbError::Schema(e.to_string()))?;
        debug!("page schema initialized");
        Ok(())
    }

    async fn insert_page(&self, page: &Node) -> StoreResult<PageRecord> {
        check_page(page)?;
        let uid = Uuid::new_v4();
        let plan = PagePlan::build(uid, page);

        let mut bindings = vec![bind("page", uid.to_string())?];
        for (i, node) in plan.nodes.iter().enumerate() {
            bindings.push(bind(format!("n{}", i), &node.row)?);
        }

        self.client
            .execute(&Self::insert_script(&plan), bindings)
            .await?;
        info!(
            uid = %uid,
            page = page.id(),
            records = plan.nodes.len(),
            "page stored"
        );
        Ok(PageRecord {
            uid,
            page: page.clone(),
        })
    }

    async fn get_page(&self, uid: Uuid) -> StoreResult<Option<PageRecord>> {
        Ok(self.load(uid).await?.map(|page| PageRecord { uid, page }))
    }

    async fn list_pages(&self) -> StoreResult<Vec<PageRecord>> {
        let uids: Vec<UidRow> = self
            .client
            .query_rows("SELECT uid FROM frame WHERE uid = page", Vec::new())
            .await?;

        let mut pages = Vec::with_capacity(uids.len());
        for row in uids {
            let uid = match Uuid::parse_str(&row.uid) {
                Ok(uid) => uid,
                Err(err) => {
                    warn!(uid = %row.uid, error = %err, "skipping page with malformed uid");
                    continue;
                }
            };
            match self.load(uid).await {
                Ok(Some(page)) => pages.push(PageRecord { uid, page }),
                Ok(None) => warn!(uid = %uid, "page vanished while listing"),
                Err(err) => warn!(uid = %uid, error = %err, "skipping unreadable page"),
            }
        }
        Ok(pages)
    }

    async fn delete_page(&self, uid: Uuid) -> StoreResult<bool> {
        // Frame records go last, nested pages included
        let sql = "DELETE children WHERE page = $page;
             DELETE layout WHERE page = $page;
             DELETE element WHERE page = $page;
             DELETE frame WHERE page = $page RETURN BEFORE;";
        let mut response = self
            .client
            .execute(sql, vec![bind("page", uid.to_string())?])
            .await?;

        let frames: Vec<UidRow> = take_rows(&mut response, 3)?;
        let removed: Vec<&UidRow> = frames
            .iter()
            .filter(|row| row.uid == uid.to_string())
            .collect();
        if removed.len() > 1 {
            return Err(StoreError::Corrupted(format!(
                "{} page records shared uid {}",
                removed.len(),
                uid
            )));
        }
        debug!(uid = %uid, removed = !removed.is_empty(), "page delete");
        Ok(!removed.is_empty())
    }
}

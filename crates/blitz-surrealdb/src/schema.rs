//! Page schema: one record per node, `children` edges for structure
//!
//! Pages live in `frame` (a page root has `uid == page`), layouts in `layout`,
//! and every leaf in `element`.
//! Each record carries its own `uid` plus the `page` uid it belongs to, so a
//! whole page can be read back or deleted with one query per table. The
//! `children` edges hold the child's `position` within its parent.

use std::collections::HashMap;

use blitz_core::{DisplayType, Node, NodeKind, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Table holding page roots
pub const PAGE_TABLE: &str = "frame";
/// Table holding layouts
pub const LAYOUT_TABLE: &str = "layout";
/// Table holding titles, inputs, selectors and references
pub const ELEMENT_TABLE: &str = "element";
/// Edge table linking a container to each child
pub const CHILDREN_EDGE: &str = "children";

/// Schema definition, safe to run repeatedly
pub const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS frame SCHEMALESS;
DEFINE TABLE IF NOT EXISTS layout SCHEMALESS;
DEFINE TABLE IF NOT EXISTS element SCHEMALESS;
DEFINE TABLE IF NOT EXISTS children SCHEMALESS;
DEFINE INDEX IF NOT EXISTS frame_uid ON frame FIELDS uid UNIQUE;
DEFINE INDEX IF NOT EXISTS frame_page ON frame FIELDS page;
DEFINE INDEX IF NOT EXISTS layout_page ON layout FIELDS page;
DEFINE INDEX IF NOT EXISTS element_page ON element FIELDS page;
DEFINE INDEX IF NOT EXISTS children_page ON children FIELDS page;
"#;

/// Table a node kind is stored in
pub fn table_for(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Page => PAGE_TABLE,
        NodeKind::Layout => LAYOUT_TABLE,
        NodeKind::Title | NodeKind::Input | NodeKind::Selector | NodeKind::Reference => {
            ELEMENT_TABLE
        }
    }
}

/// Flat record of a single node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRow {
    pub uid: String,
    pub page: String,
    pub node_id: String,
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub display_type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub variable: Option<String>,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub ref_id: Option<String>,
}

/// A `children` edge, flattened to uids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub parent: String,
    pub child: String,
    pub position: i64,
}

/// A node row and the table it goes in
#[derive(Debug, Clone)]
pub struct PlannedNode {
    pub table: &'static str,
    pub row: NodeRow,
}

/// Everything needed to write one page
#[derive(Debug, Clone, Default)]
pub struct PagePlan {
    pub nodes: Vec<PlannedNode>,
    pub edges: Vec<(usize, usize, usize)>,
}

impl PagePlan {
    /// Flatten a page into rows, assigning a fresh uid to every node.
    ///
    /// `edges` holds `(parent, child, position)` as indexes into `nodes`.
    pub fn build(page_uid: Uuid, page: &Node) -> Self {
        let mut plan = Self::default();
        plan.push(page, page_uid.to_string(), &page_uid.to_string());
        plan
    }

    fn push(&mut self, node: &Node, uid: String, page: &str) -> usize {
        let index = self.nodes.len();
        self.nodes.push(PlannedNode {
            table: table_for(node.kind()),
            row: node_to_row(node, uid, page),
        });

        if let Some(children) = node.children() {
            for (position, child) in children.iter().enumerate() {
                let child_index = self.push(child, Uuid::new_v4().to_string(), page);
                self.edges.push((index, child_index, position));
            }
        }
        index
    }
}

fn node_to_row(node: &Node, uid: String, page: &str) -> NodeRow {
    let mut row = NodeRow {
        uid,
        page: page.to_string(),
        node_id: node.id().to_string(),
        kind: node.kind().as_str().to_string(),
        ..NodeRow::default()
    };

    match node {
        Node::Page(p) => row.title = Some(p.title.clone()),
        Node::Layout(l) => {
            row.title = Some(l.title.clone());
            row.display_type = Some(display_type_name(l.display_type).to_string());
        }
        Node::Title(t) => row.value = Some(t.value.clone()),
        Node::Input(i) => {
            row.label = Some(i.label.clone());
            row.variable = Some(i.variable.clone());
            row.input_type = Some(i.input_type.clone());
        }
        Node::Selector(s) => {
            row.label = Some(s.label.clone());
            row.variable = Some(s.variable.clone());
            row.options = Some(s.options.clone());
        }
        Node::Reference(r) => row.ref_id = Some(r.ref_id.clone()),
    }
    row
}

fn display_type_name(display: DisplayType) -> &'static str {
    match display {
        DisplayType::Block => "block",
        DisplayType::Grid => "grid",
    }
}

fn parse_display_type(raw: Option<&str>) -> StoreResult<DisplayType> {
    match raw {
        None | Some("block") => Ok(DisplayType::Block),
        Some("grid") => Ok(DisplayType::Grid),
        Some(other) => Err(StoreError::Corrupted(format!(
            "unknown display type '{}'",
            other
        ))),
    }
}

fn row_to_leaf(row: &NodeRow) -> StoreResult<Node> {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();
    match row.kind.as_str() {
        "title" => Ok(Node::title(row.node_id.clone(), text(&row.value))),
        "input" => Ok(Node::input(
            row.node_id.clone(),
            text(&row.label),
            text(&row.variable),
            text(&row.input_type),
        )),
        "selector" => Ok(Node::selector(
            row.node_id.clone(),
            text(&row.label),
            text(&row.variable),
            row.options.clone().unwrap_or_default(),
        )),
        "ref" => Ok(Node::reference(row.node_id.clone(), text(&row.ref_id))),
        other => Err(StoreError::Corrupted(format!(
            "record {} has unknown kind '{}'",
            row.uid, other
        ))),
    }
}

/// Reassemble the tree rooted at `root_uid` from its rows and edges
pub fn assemble(root_uid: &str, rows: &[NodeRow], edges: &[EdgeRow]) -> StoreResult<Node> {
    let by_uid: HashMap<&str, &NodeRow> = rows.iter().map(|r| (r.uid.as_str(), r)).collect();

    let mut children: HashMap<&str, Vec<&EdgeRow>> = HashMap::new();
    for edge in edges {
        children.entry(edge.parent.as_str()).or_default().push(edge);
    }
    for list in children.values_mut() {
        list.sort_by_key(|e| e.position);
    }

    let mut visited = 0usize;
    let root = build_node(root_uid, &by_uid, &children, &mut visited)?;
    if visited != rows.len() {
        return Err(StoreError::Corrupted(format!(
            "page {} has {} records but only {} are reachable",
            root_uid,
            rows.len(),
            visited
        )));
    }
    Ok(root)
}

fn build_node(
    uid: &str,
    by_uid: &HashMap<&str, &NodeRow>,
    children: &HashMap<&str, Vec<&EdgeRow>>,
    visited: &mut usize,
) -> StoreResult<Node> {
    let row = by_uid
        .get(uid)
        .ok_or_else(|| StoreError::Corrupted(format!("missing record {}", uid)))?;
    *visited += 1;
    if *visited > by_uid.len() {
        return Err(StoreError::Corrupted(format!("cycle through record {}", uid)));
    }

    let kids = children
        .get(uid)
        .map(|edges| {
            edges
                .iter()
                .map(|e| build_node(&e.child, by_uid, children, visited))
                .collect::<StoreResult<Vec<Node>>>()
        })
        .transpose()?
        .unwrap_or_default();

    let title = row.title.clone().unwrap_or_default();
    match row.kind.as_str() {
        "page" => Ok(Node::page(row.node_id.clone(), title, kids)),
        "layout" => Ok(Node::layout(
            row.node_id.clone(),
            title,
            parse_display_type(row.display_type.as_deref())?,
            kids,
        )),
        _ if !kids.is_empty() => Err(StoreError::Corrupted(format!(
            "leaf record {} has children",
            uid
        ))),
        _ => row_to_leaf(row),
    }
}

//! UI-definition tree
//!
//! A page is a recursive tree of [`Node`]s. Only pages and layouts carry
//! children; titles, inputs, selectors and reference placeholders are leaves.
//! Node ids are unique among siblings only, never globally.
//!
//! Children are held behind [`Arc`], so cloning a tree shares every subtree.
//! Mutations go through [`Arc::make_mut`] and copy only the nodes on the way
//! from the root to the change.

mod index;
mod path;

pub use index::{IndexEntry, PathIndex};
pub use path::{validate_id, NodePath, PATH_SEPARATOR};

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{TreeError, TreeResult};

/// Ordered children of a container
pub type Children = Vec<Arc<Node>>;

/// How a layout arranges its children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    #[default]
    Block,
    Grid,
}

impl fmt::Display for DisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => f.write_str("block"),
            Self::Grid => f.write_str("grid"),
        }
    }
}

/// Top-level page (also called a frame)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub children: Children,
}

/// Nested container with a display type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub display_type: DisplayType,
    #[serde(default)]
    pub children: Children,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub id: String,
    pub label: String,
    pub variable: String,
    pub input_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    pub id: String,
    pub label: String,
    pub variable: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Placeholder replaced by a component template on first display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub id: String,
    pub ref_id: String,
}

/// One element of the UI-definition tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Page(Page),
    Layout(Layout),
    Title(Title),
    Input(Input),
    Selector(Selector),
    #[serde(rename = "ref")]
    Reference(Reference),
}

/// Variant tag of a [`Node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Page,
    Layout,
    Title,
    Input,
    Selector,
    #[serde(rename = "ref")]
    Reference,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Layout => "layout",
            Self::Title => "title",
            Self::Input => "input",
            Self::Selector => "selector",
            Self::Reference => "ref",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Page | Self::Layout)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn share(children: impl IntoIterator<Item = Node>) -> Children {
    children.into_iter().map(Arc::new).collect()
}

impl Node {
    pub fn page(
        id: impl Into<String>,
        title: impl Into<String>,
        children: impl IntoIterator<Item = Node>,
    ) -> Self {
        Self::Page(Page {
            id: id.into(),
            title: title.into(),
            children: share(children),
        })
    }

    pub fn layout(
        id: impl Into<String>,
        title: impl Into<String>,
        display_type: DisplayType,
        children: impl IntoIterator<Item = Node>,
    ) -> Self {
        Self::Layout(Layout {
            id: id.into(),
            title: title.into(),
            display_type,
            children: share(children),
        })
    }

    pub fn title(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Title(Title {
            id: id.into(),
            value: value.into(),
        })
    }

    pub fn input(
        id: impl Into<String>,
        label: impl Into<String>,
        variable: impl Into<String>,
        input_type: impl Into<String>,
    ) -> Self {
        Self::Input(Input {
            id: id.into(),
            label: label.into(),
            variable: variable.into(),
            input_type: input_type.into(),
        })
    }

    pub fn selector<S: Into<String>>(
        id: impl Into<String>,
        label: impl Into<String>,
        variable: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::Selector(Selector {
            id: id.into(),
            label: label.into(),
            variable: variable.into(),
            options: options.into_iter().map(Into::into).collect(),
        })
    }

    pub fn reference(id: impl Into<String>, ref_id: impl Into<String>) -> Self {
        Self::Reference(Reference {
            id: id.into(),
            ref_id: ref_id.into(),
        })
    }

    /// Sibling-local id
    pub fn id(&self) -> &str {
        match self {
            Self::Page(n) => &n.id,
            Self::Layout(n) => &n.id,
            Self::Title(n) => &n.id,
            Self::Input(n) => &n.id,
            Self::Selector(n) => &n.id,
            Self::Reference(n) => &n.id,
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        match self {
            Self::Page(n) => n.id = id,
            Self::Layout(n) => n.id = id,
            Self::Title(n) => n.id = id,
            Self::Input(n) => n.id = id,
            Self::Selector(n) => n.id = id,
            Self::Reference(n) => n.id = id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Page(_) => NodeKind::Page,
            Self::Layout(_) => NodeKind::Layout,
            Self::Title(_) => NodeKind::Title,
            Self::Input(_) => NodeKind::Input,
            Self::Selector(_) => NodeKind::Selector,
            Self::Reference(_) => NodeKind::Reference,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Human-readable caption: container title, title text, control label or ref id
    pub fn label(&self) -> &str {
        match self {
            Self::Page(n) => &n.title,
            Self::Layout(n) => &n.title,
            Self::Title(n) => &n.value,
            Self::Input(n) => &n.label,
            Self::Selector(n) => &n.label,
            Self::Reference(n) => &n.ref_id,
        }
    }

    /// Children of a container, `None` for leaves
    pub fn children(&self) -> Option<&Children> {
        match self {
            Self::Page(n) => Some(&n.children),
            Self::Layout(n) => Some(&n.children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Children> {
        match self {
            Self::Page(n) => Some(&mut n.children),
            Self::Layout(n) => Some(&mut n.children),
            _ => None,
        }
    }

    /// Find a direct child by its sibling-local id
    pub fn child(&self, id: &str) -> Option<&Node> {
        self.children()?
            .iter()
            .find(|c| c.id() == id)
            .map(Arc::as_ref)
    }

    /// Number of non-container nodes in this subtree
    pub fn leaf_count(&self) -> usize {
        match self.children() {
            Some(children) => children.iter().map(|c| c.leaf_count()).sum(),
            None => 1,
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map(|children| children.iter().map(|c| c.node_count()).sum())
            .unwrap_or(0)
    }

    /// Resolve a path identifier whose first segment is this node's id
    pub fn find(&self, path: &NodePath) -> Option<&Node> {
        if path.root_id() != self.id() {
            return None;
        }
        path.segments()[1..]
            .iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Check the id rules of the whole subtree.
    ///
    /// Ids must be non-empty, must not contain the path separator, and must be
    /// unique within each children sequence.
    pub fn validate(&self) -> TreeResult<()> {
        validate_id(self.id())?;
        self.validate_children(&NodePath::root(self.id()))
    }

    fn validate_children(&self, path: &NodePath) -> TreeResult<()> {
        let Some(children) = self.children() else {
            return Ok(());
        };

        let mut seen = HashSet::with_capacity(children.len());
        for child in children {
            validate_id(child.id())?;
            if !seen.insert(child.id()) {
                return Err(TreeError::DuplicateSiblingId {
                    parent: path.to_string(),
                    id: child.id().to_string(),
                });
            }
            child.validate_children(&path.child(child.id()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::page(
            "p",
            "Page 1",
            [
                Node::title("a", "Who are you"),
                Node::layout(
                    "l",
                    "Work",
                    DisplayType::Grid,
                    [Node::input("x", "name:", "name", "text")],
                ),
                Node::reference("r", "comp-fName"),
            ],
        )
    }

    #[test]
    fn test_kinds_and_containers() {
        let page = sample();
        assert_eq!(page.kind(), NodeKind::Page);
        assert!(page.is_container());
        assert!(!page.child("a").unwrap().is_container());
        assert!(page.child("l").unwrap().is_container());
        assert_eq!(page.child("r").unwrap().kind(), NodeKind::Reference);
        assert!(page.child("missing").is_none());
    }

    #[test]
    fn test_counts() {
        let page = sample();
        assert_eq!(page.leaf_count(), 3);
        assert_eq!(page.node_count(), 5);
        assert_eq!(Node::layout("e", "", DisplayType::Block, []).leaf_count(), 0);
    }

    #[test]
    fn test_find_by_path() {
        let page = sample();
        let x = page.find(&NodePath::parse("p_l_x").unwrap()).unwrap();
        assert_eq!(x.label(), "name:");
        assert_eq!(page.find(&NodePath::root("p")), Some(&page));
        assert!(page.find(&NodePath::parse("q_l").unwrap()).is_none());
        assert!(page.find(&NodePath::parse("p_a_x").unwrap()).is_none());
    }

    #[test]
    fn test_validate_accepts_sibling_local_ids() {
        let page = Node::page(
            "p",
            "",
            [
                Node::layout("l", "", DisplayType::Block, [Node::title("child0", "")]),
                Node::title("child0", ""),
            ],
        );
        assert!(page.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_siblings() {
        let page = Node::page(
            "p",
            "",
            [Node::layout(
                "l",
                "",
                DisplayType::Block,
                [Node::title("t", ""), Node::title("t", "")],
            )],
        );
        assert_eq!(
            page.validate(),
            Err(TreeError::DuplicateSiblingId {
                parent: "p_l".to_string(),
                id: "t".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_bad_ids() {
        let page = Node::page("p", "", [Node::title("street_name", "")]);
        assert!(matches!(page.validate(), Err(TreeError::InvalidId { .. })));

        let page = Node::page("", "", []);
        assert!(matches!(page.validate(), Err(TreeError::InvalidId { .. })));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::json!({
            "id": "page0",
            "type": "page",
            "title": "Page 1",
            "children": [
                { "id": "child0", "type": "title", "value": "Who are you" },
                { "id": "child1", "type": "input", "label": "name:", "variable": "name", "inputType": "text" },
                { "id": "child2", "type": "ref", "refId": "comp-fName" },
                {
                    "id": "layout0", "type": "layout", "title": "Work", "displayType": "grid",
                    "children": [
                        { "id": "child4", "type": "selector", "label": "uni:", "variable": "university", "options": [] }
                    ]
                }
            ]
        });

        let page: Node = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(page.node_count(), 6);
        match page.child("layout0").unwrap() {
            Node::Layout(layout) => assert_eq!(layout.display_type, DisplayType::Grid),
            other => panic!("expected layout, got {:?}", other),
        }
        assert_eq!(serde_json::to_value(&page).unwrap(), json);
    }

    #[test]
    fn test_set_id_keeps_content() {
        let mut node = Node::input("comp-fName", "family name:", "fName", "text");
        node.set_id("child2");
        assert_eq!(node.id(), "child2");
        assert_eq!(node.label(), "family name:");
    }
}

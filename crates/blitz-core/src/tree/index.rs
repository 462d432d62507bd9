//! Path index, rebuilt after every committed mutation

use std::collections::HashMap;

use super::{Node, NodeKind, NodePath};

/// Where a node sits in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: NodePath,
    pub parent: Option<NodePath>,
    /// Position within the parent's children
    pub position: usize,
    pub depth: usize,
    pub kind: NodeKind,
    pub child_count: usize,
}

/// Pre-order index from path identifier to position information
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    entries: Vec<IndexEntry>,
    by_path: HashMap<String, usize>,
}

impl PathIndex {
    pub fn build(root: &Node) -> Self {
        let mut index = Self::default();
        index.visit(root, NodePath::root(root.id()), None, 0);
        index
    }

    fn visit(&mut self, node: &Node, path: NodePath, parent: Option<NodePath>, position: usize) {
        let children = node.children();
        self.by_path.insert(path.to_string(), self.entries.len());
        self.entries.push(IndexEntry {
            path: path.clone(),
            parent,
            position,
            depth: path.depth(),
            kind: node.kind(),
            child_count: children.map_or(0, Vec::len),
        });

        if let Some(children) = children {
            for (i, child) in children.iter().enumerate() {
                self.visit(child, path.child(child.id()), Some(path.clone()), i);
            }
        }
    }

    pub fn get(&self, path: &NodePath) -> Option<&IndexEntry> {
        self.get_str(&path.to_string())
    }

    pub fn get_str(&self, path: &str) -> Option<&IndexEntry> {
        self.by_path.get(path).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.get(path).is_some()
    }

    /// Entries in pre-order (document order)
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Paths of every node of the given kind, in document order
    pub fn paths_of_kind(&self, kind: NodeKind) -> Vec<NodePath> {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.path.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

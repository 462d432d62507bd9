//! Flattened view of a page tree for editors
//!
//! Each node becomes a [`RenderedRow`] carrying the controls an editor shows
//! next to it. A control turns into an [`Action`] once it is bound to the
//! row's path, so the renderer never edits the tree itself.

use std::fmt;
use std::str::FromStr;

use crate::reducer::Action;
use crate::tree::{Node, NodeKind, NodePath};

/// An edit button offered next to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Delete,
    DeleteChildren,
    AddChild,
}

impl Control {
    /// Controls of every non-root node
    pub const MOVES: [Control; 5] = [
        Control::Up,
        Control::Down,
        Control::Left,
        Control::Right,
        Control::Delete,
    ];

    /// Extra controls of a container that has children
    pub const CONTAINER: [Control; 2] = [Control::DeleteChildren, Control::AddChild];

    pub fn action(self, path: NodePath) -> Action {
        match self {
            Self::Up => Action::MoveUp { path },
            Self::Down => Action::MoveDown { path },
            Self::Left => Action::MoveLeft { path },
            Self::Right => Action::MoveRight { path },
            Self::Delete => Action::Delete { path },
            Self::DeleteChildren => Action::DeleteChildren { path },
            Self::AddChild => Action::AddChild { path },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Delete => "delete",
            Self::DeleteChildren => "delete-children",
            Self::AddChild => "add-child",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Control {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "up" | "move-up" => Ok(Self::Up),
            "down" | "move-down" => Ok(Self::Down),
            "left" | "move-left" => Ok(Self::Left),
            "right" | "move-right" => Ok(Self::Right),
            "delete" => Ok(Self::Delete),
            "delete-children" | "clear" => Ok(Self::DeleteChildren),
            "add-child" | "add-children" | "add" => Ok(Self::AddChild),
            other => Err(format!("unknown control '{}'", other)),
        }
    }
}

/// One node of the flattened tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub path: NodePath,
    pub depth: usize,
    pub kind: NodeKind,
    pub label: String,
    pub controls: Vec<Control>,
}

impl RenderedRow {
    pub fn offers(&self, control: Control) -> bool {
        self.controls.contains(&control)
    }
}

/// Flatten the tree in document order
pub fn render_rows(root: &Node) -> Vec<RenderedRow> {
    let mut rows = Vec::with_capacity(root.node_count());
    collect_rows(root, NodePath::root(root.id()), &mut rows);
    rows
}

fn collect_rows(node: &Node, path: NodePath, rows: &mut Vec<RenderedRow>) {
    let mut controls = Vec::new();
    if !path.is_root() {
        controls.extend(Control::MOVES);
        if node.children().is_some_and(|c| !c.is_empty()) {
            controls.extend(Control::CONTAINER);
        }
    }

    rows.push(RenderedRow {
        depth: path.depth(),
        kind: node.kind(),
        label: node.label().to_string(),
        controls,
        path: path.clone(),
    });

    for child in node.children().into_iter().flatten() {
        collect_rows(child, path.child(child.id()), rows);
    }
}

/// Indented text view, one node per line
pub fn render_outline(root: &Node) -> String {
    let mut out = String::new();
    for row in render_rows(root) {
        let indent = "  ".repeat(row.depth);
        let caption = match (row.kind, row.label.is_empty()) {
            (NodeKind::Reference, _) => format!(" -> {}", row.label),
            (_, true) => String::new(),
            (_, false) => format!(" \"{}\"", row.label),
        };
        out.push_str(&format!("{}{} [{}]{}\n", indent, row.path, row.kind, caption));
    }
    out
}

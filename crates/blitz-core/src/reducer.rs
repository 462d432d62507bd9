//! Tree mutation reducer
//!
//! [`apply`] computes a new tree from an old tree and an [`Action`]. It never
//! mutates its input: the input is cloned (sharing every subtree) and the copy
//! is edited through [`Arc::make_mut`], which duplicates only the nodes on the
//! way from the root to the changed children sequence.
//!
//! Every action addresses its target by a [`NodePath`] and edits the target's
//! parent's children. The root has no parent and is never a valid target.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{TreeError, TreeResult};
use crate::tree::{Children, Node, NodePath};

/// Value of the title leaf appended by [`Action::AddChild`]
pub const NEW_CHILD_VALUE: &str = "New Child";

/// Edit requested by the renderer
///
/// The serialized form uses the tag names of the page-builder front end
/// (`MOVE_UP`, `ADD_CHILDREN`, `COPY_REF_ELEMENT`, ...). Unknown tags decode to
/// [`Action::Unknown`], which every reducer treats as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    MoveUp {
        #[serde(rename = "id")]
        path: NodePath,
    },
    MoveDown {
        #[serde(rename = "id")]
        path: NodePath,
    },
    MoveRight {
        #[serde(rename = "id")]
        path: NodePath,
    },
    MoveLeft {
        #[serde(rename = "id")]
        path: NodePath,
    },
    Delete {
        #[serde(rename = "id")]
        path: NodePath,
    },
    DeleteChildren {
        #[serde(rename = "id")]
        path: NodePath,
    },
    #[serde(rename = "ADD_CHILDREN")]
    AddChild {
        #[serde(rename = "id")]
        path: NodePath,
    },
    #[serde(rename = "COPY_REF_ELEMENT")]
    ResolveReference {
        #[serde(rename = "id")]
        path: NodePath,
        #[serde(rename = "elementConfig")]
        template: Node,
    },
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Target of the action, `None` for [`Action::Unknown`]
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            Self::MoveUp { path }
            | Self::MoveDown { path }
            | Self::MoveRight { path }
            | Self::MoveLeft { path }
            | Self::Delete { path }
            | Self::DeleteChildren { path }
            | Self::AddChild { path }
            | Self::ResolveReference { path, .. } => Some(path),
            Self::Unknown => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveUp { .. } => "MOVE_UP",
            Self::MoveDown { .. } => "MOVE_DOWN",
            Self::MoveRight { .. } => "MOVE_RIGHT",
            Self::MoveLeft { .. } => "MOVE_LEFT",
            Self::Delete { .. } => "DELETE",
            Self::DeleteChildren { .. } => "DELETE_CHILDREN",
            Self::AddChild { .. } => "ADD_CHILDREN",
            Self::ResolveReference { .. } => "COPY_REF_ELEMENT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Apply an action, returning the unchanged tree when it fails or is a no-op
pub fn apply(tree: &Node, action: &Action) -> Node {
    match try_apply(tree, action) {
        Ok(next) => next,
        Err(err) if err.is_silent() => {
            debug!(action = action.name(), error = %err, "action ignored");
            tree.clone()
        }
        Err(err) => {
            warn!(action = action.name(), error = %err, "action rejected");
            tree.clone()
        }
    }
}

/// Apply an action, reporting why it could not be applied
///
/// On error no partial result escapes: the edited copy is dropped.
pub fn try_apply(tree: &Node, action: &Action) -> TreeResult<Node> {
    let mut next = tree.clone();
    match action {
        Action::MoveUp { path } => move_up(&mut next, path)?,
        Action::MoveDown { path } => move_down(&mut next, path)?,
        Action::MoveRight { path } => move_right(&mut next, path)?,
        Action::MoveLeft { path } => move_left(&mut next, path)?,
        Action::Delete { path } => delete(&mut next, path)?,
        Action::DeleteChildren { path } => delete_children(&mut next, path)?,
        Action::AddChild { path } => add_child(&mut next, path)?,
        Action::ResolveReference { path, template } => {
            resolve_reference(&mut next, path, template)?
        }
        Action::Unknown => return Ok(next),
    }
    Ok(next)
}

/// Walk from the root to the target's parent and return its children together
/// with the target's position among them.
fn siblings_mut<'a>(root: &'a mut Node, path: &NodePath) -> TreeResult<(&'a mut Children, usize)> {
    if path.is_root() {
        return Err(TreeError::invalid_move(path, "the root has no parent"));
    }
    if path.root_id() != root.id() {
        return Err(TreeError::not_found(path));
    }

    let mut current = root;
    for segment in path.intermediate() {
        let children = current
            .children_mut()
            .ok_or_else(|| TreeError::not_found(path))?;
        let position = children
            .iter()
            .position(|c| c.id() == segment.as_str())
            .ok_or_else(|| TreeError::not_found(path))?;
        current = Arc::make_mut(&mut children[position]);
    }

    let siblings = current
        .children_mut()
        .ok_or_else(|| TreeError::not_found(path))?;
    let index = siblings
        .iter()
        .position(|c| c.id() == path.target())
        .ok_or_else(|| TreeError::not_found(path))?;
    Ok((siblings, index))
}

fn move_up(root: &mut Node, path: &NodePath) -> TreeResult<()> {
    let (siblings, index) = siblings_mut(root, path)?;
    if index > 0 {
        siblings.swap(index, index - 1);
    }
    Ok(())
}

fn move_down(root: &mut Node, path: &NodePath) -> TreeResult<()> {
    let (siblings, index) = siblings_mut(root, path)?;
    let last = siblings.len() - 1;
    let to = (index + 1).min(last);
    if to != index {
        siblings.swap(index, to);
    }
    Ok(())
}

fn move_right(root: &mut Node, path: &NodePath) -> TreeResult<()> {
    let (siblings, index) = siblings_mut(root, path)?;
    if index == 0 {
        return Err(TreeError::invalid_move(path, "no preceding sibling"));
    }

    let target = path.target();
    match siblings[index - 1].children() {
        None => {
            return Err(TreeError::invalid_move(
                path,
                "preceding sibling is not a container",
            ))
        }
        Some(children) if children.iter().any(|c| c.id() == target) => {
            return Err(TreeError::invalid_move(
                path,
                format!("preceding sibling already has a child '{}'", target),
            ))
        }
        Some(_) => {}
    }

    let item = siblings.remove(index);
    let new_parent = Arc::make_mut(&mut siblings[index - 1]);
    if let Some(children) = new_parent.children_mut() {
        children.push(item);
    }
    Ok(())
}

fn move_left(root: &mut Node, path: &NodePath) -> TreeResult<()> {
    let parent_path = match path.parent() {
        Some(parent) if !parent.is_root() => parent,
        Some(_) => return Err(TreeError::invalid_move(path, "the parent is the root")),
        None => return Err(TreeError::invalid_move(path, "the root has no parent")),
    };

    // The parent's siblings are the grandparent's children.
    let (grandparent_children, parent_index) = siblings_mut(root, &parent_path)?;

    let target = path.target();
    let exists = grandparent_children[parent_index]
        .children()
        .is_some_and(|children| children.iter().any(|c| c.id() == target));
    if !exists {
        return Err(TreeError::not_found(path));
    }
    if grandparent_children.iter().any(|c| c.id() == target) {
        return Err(TreeError::invalid_move(
            path,
            format!("grandparent already has a child '{}'", target),
        ));
    }

    let parent = Arc::make_mut(&mut grandparent_children[parent_index]);
    let siblings = parent
        .children_mut()
        .ok_or_else(|| TreeError::not_found(path))?;
    let index = siblings
        .iter()
        .position(|c| c.id() == target)
        .ok_or_else(|| TreeError::not_found(path))?;
    let item = siblings.remove(index);
    grandparent_children.push(item);
    Ok(())
}

fn delete(root: &mut Node, path: &NodePath) -> TreeResult<()> {
    let (siblings, index) = siblings_mut(root, path)?;
    siblings.remove(index);
    Ok(())
}

fn delete_children(root: &mut Node, path: &NodePath) -> TreeResult<()> {
    let (siblings, index) = siblings_mut(root, path)?;
    if !siblings[index].is_container() {
        return Err(TreeError::NotAContainer {
            path: path.to_string(),
        });
    }
    if let Some(children) = Arc::make_mut(&mut siblings[index]).children_mut() {
        children.clear();
    }
    Ok(())
}

fn add_child(root: &mut Node, path: &NodePath) -> TreeResult<()> {
    let (siblings, index) = siblings_mut(root, path)?;
    if !siblings[index].is_container() {
        return Err(TreeError::NotAContainer {
            path: path.to_string(),
        });
    }
    if let Some(children) = Arc::make_mut(&mut siblings[index]).children_mut() {
        let id = next_child_id(children);
        children.push(Arc::new(Node::title(id, NEW_CHILD_VALUE)));
    }
    Ok(())
}

/// `child{n}` with the smallest `n > len` not already used by a sibling
fn next_child_id(children: &Children) -> String {
    (children.len() + 1..)
        .map(|n| format!("child{}", n))
        .find(|id| children.iter().all(|c| c.id() != id.as_str()))
        .unwrap_or_default()
}

fn resolve_reference(root: &mut Node, path: &NodePath, template: &Node) -> TreeResult<()> {
    // The substitute keeps the placeholder's id so paths and sibling ids stay valid.
    let mut replacement = template.clone();
    replacement.set_id(path.target());
    replacement.validate()?;

    let (siblings, index) = siblings_mut(root, path)?;
    if !matches!(siblings[index].as_ref(), Node::Reference(_)) {
        return Err(TreeError::NotAReference {
            path: path.to_string(),
        });
    }
    siblings[index] = Arc::new(replacement);
    Ok(())
}

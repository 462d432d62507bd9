//! Tree error types

use thiserror::Error;

use crate::tree::NodeKind;

/// Errors raised while validating a tree or applying an action to it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A path segment does not resolve to a node
    #[error("node not found: {path}")]
    NodeNotFound { path: String },

    /// Structurally illegal move (root target, missing grandparent, leaf sibling, ...)
    #[error("invalid move for {path}: {reason}")]
    InvalidMove { path: String, reason: String },

    /// Action needs a container but the target is a leaf
    #[error("node is not a container: {path}")]
    NotAContainer { path: String },

    /// Action needs a reference placeholder but the target is something else
    #[error("node is not a reference: {path}")]
    NotAReference { path: String },

    /// Two siblings share the same id
    #[error("duplicate id '{id}' among the children of '{parent}'")]
    DuplicateSiblingId { parent: String, id: String },

    /// A node id cannot be used in a path identifier
    #[error("invalid node id '{id}': {reason}")]
    InvalidId { id: String, reason: String },

    /// A path identifier could not be parsed
    #[error("invalid path identifier '{0}'")]
    InvalidPath(String),

    /// The root of an editable tree must be a page
    #[error("tree root must be a page, found {kind}")]
    InvalidRoot { kind: NodeKind },
}

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

impl TreeError {
    /// Create a node-not-found error
    pub fn not_found(path: impl ToString) -> Self {
        Self::NodeNotFound {
            path: path.to_string(),
        }
    }

    /// Create an invalid-move error
    pub fn invalid_move(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidMove {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Errors the reducer swallows without a warning.
    ///
    /// Delete-children, add-child and reference resolution are only offered on
    /// nodes of the matching kind, so a mismatch is treated as a no-op.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::NotAContainer { .. } | Self::NotAReference { .. })
    }
}

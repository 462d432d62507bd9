//! Path identifiers
//!
//! A path identifier joins the sibling-local ids of a node's ancestor chain,
//! root first and target last: `page0_layout0_child4`. It is positional, so
//! any reorder or removal above a node invalidates the paths below it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TreeError, TreeResult};

/// Separator between path segments
pub const PATH_SEPARATOR: char = '_';

/// Check that `id` can be used as a node id and path segment
pub fn validate_id(id: &str) -> TreeResult<()> {
    if id.is_empty() {
        return Err(TreeError::InvalidId {
            id: id.to_string(),
            reason: "id is empty".to_string(),
        });
    }
    if id.contains(PATH_SEPARATOR) {
        return Err(TreeError::InvalidId {
            id: id.to_string(),
            reason: format!("id contains the path separator '{}'", PATH_SEPARATOR),
        });
    }
    Ok(())
}

/// Chain of sibling-local ids from the root to a target node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    /// Parse a path identifier such as `"p_l_x"`
    pub fn parse(raw: &str) -> TreeResult<Self> {
        if raw.is_empty() {
            return Err(TreeError::InvalidPath(raw.to_string()));
        }

        let segments: Vec<String> = raw.split(PATH_SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(TreeError::InvalidPath(raw.to_string()));
        }

        Ok(Self { segments })
    }

    /// Path of a root node
    ///
    /// `id` must be a valid node id; see [`NodePath::try_root`].
    pub fn root(id: impl Into<String>) -> Self {
        let id = id.into();
        debug_assert!(validate_id(&id).is_ok(), "invalid path segment '{}'", id);
        Self { segments: vec![id] }
    }

    /// Path of a root node, rejecting ids that would not survive a round trip
    pub fn try_root(id: impl Into<String>) -> TreeResult<Self> {
        let id = id.into();
        validate_id(&id)?;
        Ok(Self { segments: vec![id] })
    }

    /// Path of the child `id` below this path
    ///
    /// `id` must be a valid node id; see [`NodePath::try_child`].
    pub fn child(&self, id: impl Into<String>) -> Self {
        let id = id.into();
        debug_assert!(validate_id(&id).is_ok(), "invalid path segment '{}'", id);
        let mut segments = self.segments.clone();
        segments.push(id);
        Self { segments }
    }

    pub fn try_child(&self, id: impl Into<String>) -> TreeResult<Self> {
        let id = id.into();
        validate_id(&id)?;
        let mut segments = self.segments.clone();
        segments.push(id);
        Ok(Self { segments })
    }

    /// Path of the parent, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// All segments, root first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Id of the root the path starts from
    pub fn root_id(&self) -> &str {
        &self.segments[0]
    }

    /// Sibling-local id of the target node
    pub fn target(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Ids strictly between the root and the target
    pub fn intermediate(&self) -> &[String] {
        if self.is_root() {
            return &[];
        }
        &self.segments[1..self.segments.len() - 1]
    }

    /// Number of edges from the root
    pub fn depth(&self) -> usize {
        self.segments.len() - 1
    }

    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NodePath {
    type Error = TreeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.to_string()
    }
}

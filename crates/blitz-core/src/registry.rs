//! Component template registry
//!
//! Registries are built once and then read-only. Use a builder to construct,
//! then call `.build()` to get an immutable registry. Rebuild on changes.
//!
//! A [`TemplateRegistry`] maps a reference id (`comp-address`, ...) to the
//! subtree a [`Node::Reference`] placeholder is replaced with. Lookups hand
//! out values, so a resolved subtree never aliases the stored template.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::TreeError;
use crate::tree::{DisplayType, Node};

/// A read-only registry for key-value lookups
///
/// Implementations are expected to be immutable after construction.
/// Use a builder pattern to construct registries.
pub trait Registry {
    /// The key type used for lookups
    type Key;

    /// The value type stored in the registry
    type Value;

    /// Get a value by key
    fn get<Q>(&self, key: &Q) -> Option<&Self::Value>
    where
        Self::Key: Borrow<Q>,
        Q: ?Sized + Eq + std::hash::Hash;

    /// Check if the registry contains a key
    fn contains<Q>(&self, key: &Q) -> bool
    where
        Self::Key: Borrow<Q>,
        Q: ?Sized + Eq + std::hash::Hash,
    {
        self.get(key).is_some()
    }

    /// List all key-value pairs
    fn iter(&self) -> impl Iterator<Item = (&Self::Key, &Self::Value)>;

    /// Number of entries in the registry
    fn len(&self) -> usize;

    /// Check if the registry is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A mutable registry builder
///
/// Accumulates registrations, then call `.build()` to create an immutable registry.
pub trait RegistryBuilder: Default {
    /// The immutable registry type this builder produces
    type Registry: Registry;

    /// The key type
    type Key;

    /// The value type
    type Value;

    /// Register a key-value pair
    fn register(self, key: Self::Key, value: Self::Value) -> Self;

    /// Build the immutable registry
    fn build(self) -> Self::Registry;
}

/// Template registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No template registered under this reference id
    #[error("template not found: {ref_id}")]
    NotFound { ref_id: String },

    /// Template subtree breaks the tree id rules
    #[error("invalid template '{ref_id}': {source}")]
    InvalidTemplate {
        ref_id: String,
        #[source]
        source: TreeError,
    },

    /// IO error reading a template file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template file could not be decoded
    #[error("Template parse error: {0}")]
    Parse(String),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Immutable mapping from reference id to template subtree
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Node>,
}

impl TemplateRegistry {
    pub fn builder() -> TemplateRegistryBuilder {
        TemplateRegistryBuilder::default()
    }

    /// Registry holding the stock composed components
    pub fn builtin() -> Self {
        TemplateRegistryBuilder::default().with_builtin().build()
    }

    /// Copy of the template registered under `ref_id`
    pub fn lookup(&self, ref_id: &str) -> RegistryResult<Node> {
        self.templates
            .get(ref_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                ref_id: ref_id.to_string(),
            })
    }

    /// Registered reference ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Registry for TemplateRegistry {
    type Key = String;
    type Value = Node;

    fn get<Q>(&self, key: &Q) -> Option<&Node>
    where
        Self::Key: Borrow<Q>,
        Q: ?Sized + Eq + std::hash::Hash,
    {
        self.templates.get(key)
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.templates.iter()
    }

    fn len(&self) -> usize {
        self.templates.len()
    }
}

/// Builder for [`TemplateRegistry`]
#[derive(Debug, Default)]
pub struct TemplateRegistryBuilder {
    templates: HashMap<String, Node>,
}

impl TemplateRegistryBuilder {
    /// Register a template, rejecting subtrees that break the id rules
    pub fn try_register(mut self, ref_id: impl Into<String>, template: Node) -> RegistryResult<Self> {
        let ref_id = ref_id.into();
        template
            .validate()
            .map_err(|source| RegistryError::InvalidTemplate {
                ref_id: ref_id.clone(),
                source,
            })?;
        if self.templates.insert(ref_id.clone(), template).is_some() {
            debug!(ref_id = %ref_id, "template replaced");
        }
        Ok(self)
    }

    /// Add the stock composed components
    pub fn with_builtin(self) -> Self {
        builtin_templates()
            .into_iter()
            .fold(self, |builder, (ref_id, template)| {
                builder.register(ref_id.to_string(), template)
            })
    }

    /// Add every template of a JSON or YAML file mapping reference ids to subtrees
    pub fn with_file(self, path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let templates = parse_templates(path, &content)?;
        debug!(path = %path.display(), count = templates.len(), "loaded templates");

        let mut sorted: Vec<(String, Node)> = templates.into_iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted
            .into_iter()
            .try_fold(self, |builder, (ref_id, template)| builder.try_register(ref_id, template))
    }
}

impl RegistryBuilder for TemplateRegistryBuilder {
    type Registry = TemplateRegistry;
    type Key = String;
    type Value = Node;

    fn register(mut self, key: String, value: Node) -> Self {
        self.templates.insert(key, value);
        self
    }

    /// Invalid templates are dropped with a warning; use
    /// [`TemplateRegistryBuilder::try_register`] to surface them instead.
    fn build(self) -> TemplateRegistry {
        let templates = self
            .templates
            .into_iter()
            .filter(|(ref_id, template)| match template.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(ref_id = %ref_id, error = %err, "dropping invalid template");
                    false
                }
            })
            .collect();
        TemplateRegistry { templates }
    }
}

fn parse_templates(path: &Path, content: &str) -> RegistryResult<HashMap<String, Node>> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(content).map_err(|e| RegistryError::Parse(e.to_string()))
    } else {
        serde_json::from_str(content).map_err(|e| RegistryError::Parse(e.to_string()))
    }
}

fn builtin_templates() -> Vec<(&'static str, Node)> {
    vec![
        (
            "comp-fName",
            Node::input("comp-fName", "your family name:", "fName", "text"),
        ),
        (
            "comp-address",
            Node::layout(
                "comp-address",
                "Address",
                DisplayType::Grid,
                [
                    Node::input("child0", "Street Name:", "street_name", "text"),
                    Node::input("child1", "Street Number:", "street_number", "number"),
                    Node::input("child2", "Postal Code:", "postal_code", "number"),
                    Node::selector(
                        "child3",
                        "city:",
                        "{city}",
                        ["USA", "UK", "France", "England", "Canada", "Australia"],
                    ),
                ],
            ),
        ),
    ]
}

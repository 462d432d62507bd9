//! Reading and writing page files

use std::path::Path;

use anyhow::{bail, Context, Result};
use blitz_core::{Node, NodeKind, TreeStore};

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Decode a page tree from JSON or YAML, picked by extension
pub fn read_page(path: &Path) -> Result<Node> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page file {}", path.display()))?;
    let page: Node = if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML page {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON page {}", path.display()))?
    };
    if page.kind() != NodeKind::Page {
        bail!(
            "{} holds a {} at the top level, expected a page",
            path.display(),
            page.kind()
        );
    }
    Ok(page)
}

/// Open a page file as an editable store
pub fn open_store(path: &Path) -> Result<TreeStore> {
    let page = read_page(path)?;
    TreeStore::new(page).with_context(|| format!("Invalid page tree in {}", path.display()))
}

pub fn encode_page(path: &Path, page: &Node) -> Result<String> {
    if is_yaml(path) {
        Ok(serde_yaml::to_string(page)?)
    } else {
        let mut json = serde_json::to_string_pretty(page)?;
        json.push('\n');
        Ok(json)
    }
}

pub fn write_page(path: &Path, page: &Node) -> Result<()> {
    let content = encode_page(path, page)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write page file {}", path.display()))
}

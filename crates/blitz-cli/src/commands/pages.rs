use anyhow::{Context, Result};
use blitz_core::{PageRecord, PageStore};

use crate::config::CliConfig;

/// One summary line per stored page
pub fn format_pages(pages: &[PageRecord]) -> String {
    if pages.is_empty() {
        return "No pages stored\n".to_string();
    }

    let mut out = format!("{:<36}  {:<12}  {:>5}  TITLE\n", "UID", "ID", "NODES");
    for record in pages {
        out.push_str(&format!(
            "{:<36}  {:<12}  {:>5}  {}\n",
            record.uid,
            record.page.id(),
            record.page.node_count(),
            record.page.label()
        ));
    }
    out
}

pub async fn execute(config: CliConfig, json: bool) -> Result<()> {
    if let Some(note) = config.storage_note() {
        eprintln!("note: {}", note);
    }
    let store = config.page_store().await?;
    let pages = store.list_pages().await.context("Failed to list pages")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
    } else {
        print!("{}", format_pages(&pages));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blitz_core::Node;
    use uuid::Uuid;

    #[test]
    fn test_format_pages() {
        assert_eq!(format_pages(&[]), "No pages stored\n");

        let record = PageRecord {
            uid: Uuid::nil(),
            page: Node::page("page0", "Page 1", [Node::title("child0", "Hi")]),
        };
        let out = format_pages(&[record]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("00000000-0000-0000-0000-000000000000  page0"));
        assert!(lines[1].ends_with("2  Page 1"));
    }
}

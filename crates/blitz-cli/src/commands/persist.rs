use std::path::PathBuf;

use anyhow::{Context, Result};
use blitz_core::PageStore;
use tracing::info;

use crate::commands::templates::resolve_all;
use crate::config::CliConfig;
use crate::page_file::open_store;

pub async fn execute(config: CliConfig, file: PathBuf, resolve: bool) -> Result<()> {
    let mut tree = open_store(&file)?;
    if resolve {
        resolve_all(&config, &mut tree)?;
    }

    let pages = config.page_store().await?;
    let record = pages
        .insert_page(tree.tree())
        .await
        .with_context(|| format!("Failed to store {}", file.display()))?;

    info!(uid = %record.uid, path = %file.display(), "page persisted");
    println!("{}", record.uid);
    if let Some(note) = config.storage_note() {
        eprintln!("note: {}", note);
    }
    Ok(())
}

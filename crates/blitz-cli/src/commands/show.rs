use std::path::PathBuf;

use anyhow::Result;
use blitz_core::render_outline;

use crate::commands::templates::resolve_all;
use crate::config::CliConfig;
use crate::page_file::open_store;

pub fn execute(config: CliConfig, file: PathBuf, resolve: bool, json: bool) -> Result<()> {
    let mut store = open_store(&file)?;
    if resolve {
        resolve_all(&config, &mut store)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(store.tree())?);
    } else {
        print!("{}", render_outline(store.tree()));
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use blitz_core::{render_outline, Action, Control, DispatchOutcome, NodePath, TreeStore};
use tracing::info;

use crate::commands::templates::resolve_all;
use crate::config::CliConfig;
use crate::page_file::{open_store, write_page};

/// Parse `CONTROL:PATH` into an action
pub fn parse_edit(raw: &str) -> Result<Action> {
    let (control, path) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("edit '{}' is not of the form CONTROL:PATH", raw))?;
    let control: Control = control.parse().map_err(|e: String| anyhow!(e))?;
    let path = NodePath::parse(path).with_context(|| format!("in edit '{}'", raw))?;
    Ok(control.action(path))
}

/// Dispatch every edit in order; the first rejected edit aborts the run
pub fn apply_edits(store: &mut TreeStore, edits: &[String]) -> Result<usize> {
    let mut committed = 0;
    for raw in edits {
        let action = parse_edit(raw)?;
        match store
            .dispatch(&action)
            .with_context(|| format!("edit '{}' rejected", raw))?
        {
            DispatchOutcome::Committed { .. } => committed += 1,
            DispatchOutcome::Unchanged => eprintln!("note: '{}' changed nothing", raw),
        }
    }
    Ok(committed)
}

pub fn execute(
    config: CliConfig,
    file: PathBuf,
    edits: Vec<String>,
    output: Option<PathBuf>,
    resolve: bool,
    dry_run: bool,
) -> Result<()> {
    let mut store = open_store(&file)?;
    if resolve {
        resolve_all(&config, &mut store)?;
    }

    let committed = apply_edits(&mut store, &edits)?;

    if dry_run {
        print!("{}", render_outline(store.tree()));
        return Ok(());
    }

    let target = output.unwrap_or(file);
    write_page(&target, store.tree())?;
    info!(
        path = %target.display(),
        edits = committed,
        revision = store.revision(),
        "page written"
    );
    println!("{} edit(s) applied, written to {}", committed, target.display());
    Ok(())
}

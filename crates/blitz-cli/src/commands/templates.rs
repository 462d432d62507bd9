use anyhow::Result;
use blitz_core::{render_outline, Registry, TreeStore};
use tracing::warn;

use crate::config::CliConfig;

pub fn execute(config: CliConfig, show: bool) -> Result<()> {
    let registry = config.registry()?;
    if registry.is_empty() {
        println!("No templates registered");
        return Ok(());
    }

    for ref_id in registry.ids() {
        println!("{}", ref_id);
        if show {
            let template = registry.lookup(ref_id)?;
            for line in render_outline(&template).lines() {
                println!("  {}", line);
            }
        }
    }
    Ok(())
}

/// Resolve every reference in `store` with the configured registry.
///
/// Unknown ref ids are reported and left as placeholders.
pub fn resolve_all(config: &CliConfig, store: &mut TreeStore) -> Result<()> {
    let registry = config.registry()?;
    let report = store.resolve_references(&registry);
    for missing in &report.unresolved {
        warn!(path = %missing.path, ref_id = %missing.ref_id, "no template for reference");
        eprintln!("warning: no template '{}' for {}", missing.ref_id, missing.path);
    }
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use blitz_cli::{
    cli::{Cli, Commands},
    commands,
    config::CliConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.clone())?;

    // --log-level / --verbose, then RUST_LOG, then the config file
    let env_filter = match cli.requested_level() {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.blitz.logging.level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    debug!(config = ?config.blitz, "configuration loaded");

    match cli.command {
        Commands::Show {
            file,
            resolve,
            json,
        } => commands::show::execute(config, file, resolve, json)?,

        Commands::Edit {
            file,
            edits,
            output,
            resolve,
            dry_run,
        } => commands::edit::execute(config, file, edits, output, resolve, dry_run)?,

        Commands::Templates { show } => commands::templates::execute(config, show)?,

        Commands::Demo { output, resolve } => commands::demo::execute(config, output, resolve)?,

        Commands::Persist { file, resolve } => {
            commands::persist::execute(config, file, resolve).await?
        }

        Commands::Pages { json } => commands::pages::execute(config, json).await?,
    }

    Ok(())
}

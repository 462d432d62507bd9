use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(name = "blitz")]
#[command(about = "blitz - edit hierarchical page definitions from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses RUST_LOG, then the config file value
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/blitz/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Level requested on the command line, if any
    pub fn requested_level(&self) -> Option<LevelFilter> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level.into()),
            (None, true) => Some(LevelFilter::DEBUG),
            (None, false) => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the outline of a page file
    Show {
        /// Page file (JSON or YAML)
        file: PathBuf,

        /// Replace reference placeholders with their templates first
        #[arg(short, long)]
        resolve: bool,

        /// Print the tree as JSON instead of an outline
        #[arg(long)]
        json: bool,
    },

    /// Apply edits to a page file
    Edit {
        /// Page file (JSON or YAML)
        file: PathBuf,

        /// Edits as CONTROL:PATH, e.g. down:page0_child1 or add-child:page0_layout0
        #[arg(required = true)]
        edits: Vec<String>,

        /// Write the result here instead of back to FILE
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Resolve reference placeholders before editing
        #[arg(short, long)]
        resolve: bool,

        /// Print the result without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List the registered component templates
    Templates {
        /// Also print each template's outline
        #[arg(long)]
        show: bool,
    },

    /// Print or write the sample page
    Demo {
        /// Write the page here (JSON or YAML) instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Resolve reference placeholders
        #[arg(short, long)]
        resolve: bool,
    },

    /// Store a page file in the page database
    Persist {
        /// Page file (JSON or YAML)
        file: PathBuf,

        /// Resolve reference placeholders before storing
        #[arg(short, long)]
        resolve: bool,
    },

    /// List the pages in the page database
    ///
    /// Without a configured database path the database is in memory and starts
    /// empty on every run. File databases need the `rocksdb` build feature.
    Pages {
        /// Print full page trees as JSON
        #[arg(long)]
        json: bool,
    },
}

//! # Blitz Configuration
//!
//! Typed configuration for the Blitz tools: logging level, page database
//! location and component template sources.
//!
//! Files may be TOML, YAML or JSON, picked by extension. Every section and
//! field is optional; missing values take their defaults. `BLITZ_*`
//! environment variables override file values.
//!
//! ```rust,no_run
//! use blitz_config::ConfigLoader;
//!
//! # fn main() -> Result<(), blitz_config::ConfigError> {
//! let config = ConfigLoader::load_or_default(None)?;
//! println!("{}", config.logging.level);
//! # Ok(())
//! # }
//! ```

mod config;
mod loader;

pub use config::*;
pub use loader::*;

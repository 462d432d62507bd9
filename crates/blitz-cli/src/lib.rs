//! Blitz CLI library
//!
//! Command implementations for the `blitz` binary: showing, editing and
//! persisting page files, and listing component templates.

pub mod cli;
pub mod commands;
pub mod config;
pub mod page_file;

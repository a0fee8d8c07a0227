//! Command-line interface for game-minder.
//!
//! This module provides CLI commands for importing games from the catalog
//! provider into the local library.

mod commands;

pub use commands::{Cli, Commands, ImportCommands, run_command};

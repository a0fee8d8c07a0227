//! Game Minder - a game library import tool.
//!
//! Pulls game records from the IGDB catalog API (rate limited, Twitch OAuth2
//! authenticated) and reconciles them into a local SQLite library: existing
//! games are updated in place, new ones created, and genre/platform/company
//! references deduplicated by name.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("game_minder=info".parse().unwrap()))
        .init();

    cli::run_command(args).await
}

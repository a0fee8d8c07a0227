//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed
//! arguments and returns an `anyhow::Result<()>`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::domain::ImportReport;
use crate::catalog::{IgdbClient, ImportService};
use crate::store::{SqliteStore, db_url};
use crate::{config, error::Error};

/// Game Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Twitch application client id (or set TWITCH_CLIENT_ID env var)
    #[arg(long, env = "TWITCH_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// Twitch application client secret (or set TWITCH_CLIENT_SECRET env var)
    #[arg(long, env = "TWITCH_CLIENT_SECRET", global = true)]
    pub client_secret: Option<String>,

    /// Database file path
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Import games from the catalog provider
    Import {
        #[command(subcommand)]
        what: ImportCommands,
    },
}

/// What to import
#[derive(Subcommand)]
pub enum ImportCommands {
    /// Games released within the last 30 days
    Recent {
        /// Maximum number of games to import
        #[arg(short, long, default_value_t = 50)]
        limit: u32,
    },
    /// Specific games by IGDB id
    Ids {
        /// IGDB game ids
        ids: Vec<i64>,
    },
    /// Games matching a free-text search
    Search {
        /// Search query
        query: String,
        /// Maximum number of games to import
        #[arg(short, long, default_value_t = 25)]
        limit: u32,
    },
    /// The highest-rated games
    Top {
        /// Maximum number of games to import
        #[arg(short, long, default_value_t = 100)]
        limit: u32,
        /// Minimum number of ratings a game must have
        #[arg(long = "min-ratings", default_value_t = 50)]
        min_rating_count: u32,
    },
}

/// Execute the parsed command.
pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = config::load();

    // Flags/env take precedence over the config file.
    if cli.client_id.is_some() {
        config.credentials.client_id = cli.client_id.clone();
    }
    if cli.client_secret.is_some() {
        config.credentials.client_secret = cli.client_secret.clone();
    }
    if cli.database.is_some() {
        config.library.database_path = cli.database.clone();
    }

    config.validate()?;
    let client_id = config
        .credentials
        .client_id
        .clone()
        .ok_or_else(|| Error::config("client id missing (flag, env var, or config file)"))?;
    let client_secret = config
        .credentials
        .client_secret
        .clone()
        .ok_or_else(|| Error::config("client secret missing (flag, env var, or config file)"))?;

    let store = SqliteStore::open(&db_url(config.library.database_path.as_deref())).await?;
    let client = IgdbClient::new(
        &config.provider.base_url,
        &config.provider.auth_url,
        client_id,
        client_secret,
    );
    let service = ImportService::new(client, store);

    let Commands::Import { what } = cli.command;
    let report = match what {
        ImportCommands::Recent { limit } => service.import_recent(limit).await?,
        ImportCommands::Ids { ids } => service.import_by_ids(&ids).await?,
        ImportCommands::Search { query, limit } => service.search_and_import(&query, limit).await?,
        ImportCommands::Top {
            limit,
            min_rating_count,
        } => service.import_top_rated(limit, min_rating_count).await?,
    };

    print_report(&report);
    Ok(())
}

/// Print a human-readable batch summary.
fn print_report(report: &ImportReport) {
    println!(
        "Import completed: {} created, {} updated, {} failed ({} total)",
        report.created,
        report.updated,
        report.failed(),
        report.total()
    );

    for game in &report.games {
        let release = game
            .release_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unreleased".to_string());
        println!("  ✓ {} ({})", game.title, release);
    }

    for failure in &report.failures {
        eprintln!(
            "  ✗ {} (IGDB {}): {}",
            failure.name, failure.igdb_id, failure.reason
        );
    }
}

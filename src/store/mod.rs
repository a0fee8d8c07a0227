//! Persistence contract for the game library.
//!
//! The import service talks to storage only through [`CatalogStore`], so
//! tests run against an in-memory implementation and production against
//! [`SqliteStore`].

mod sqlite;

pub use sqlite::{SqliteStore, db_url};

use async_trait::async_trait;

use crate::catalog::domain::{Game, Reference, ReferenceKind};

/// Storage-side errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend-specific failure that is not a SQL error (used by alternate
    /// store implementations and test doubles)
    #[error("storage failure: {0}")]
    Backend(String),
}

/// Repository contract for games and their reference entities.
///
/// Implementations must enforce two uniqueness invariants:
/// - at most one game per `igdb_id`;
/// - at most one reference per (kind, case-insensitive name). Under that
///   constraint [`create_reference`](CatalogStore::create_reference) must be
///   conflict-safe: when a concurrent writer wins the insert race, the call
///   resolves to the existing row instead of failing.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up a game by its provider id, relationship sets included.
    async fn find_game_by_igdb_id(&self, igdb_id: i64) -> Result<Option<Game>, StoreError>;

    /// Cheap existence probe by provider id.
    async fn game_exists(&self, igdb_id: i64) -> Result<bool, StoreError>;

    /// Upsert a game and replace its association rows atomically.
    ///
    /// Returns the persisted entity with its internal id assigned.
    async fn save_game(&self, game: &Game) -> Result<Game, StoreError>;

    /// Case-insensitive reference lookup by name.
    async fn find_reference_by_name(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<Option<Reference>, StoreError>;

    /// Insert a reference, or fetch the existing row when the name is
    /// already taken.
    async fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
        description: Option<&str>,
    ) -> Result<Reference, StoreError>;
}

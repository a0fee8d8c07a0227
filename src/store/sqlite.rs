//! SQLite implementation of the store.
//!
//! Uses SQLx with SQLite for lightweight, embedded storage. The schema is
//! created on open with `CREATE TABLE IF NOT EXISTS` - three tables:
//! `games`, `catalog_refs` (genres/platforms/companies, one table
//! discriminated by kind), and the `game_refs` association table keyed by
//! (game id, reference id).

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use super::{CatalogStore, StoreError};
use crate::catalog::domain::{Game, Reference, ReferenceKind};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "game_minder.db";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current
/// directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    igdb_id INTEGER NOT NULL UNIQUE,
    title TEXT NOT NULL,
    description TEXT,
    release_date TEXT,
    cover_url TEXT
);

CREATE TABLE IF NOT EXISTS catalog_refs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_catalog_refs_kind_name
    ON catalog_refs (kind, name COLLATE NOCASE);

CREATE TABLE IF NOT EXISTS game_refs (
    game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    ref_id INTEGER NOT NULL REFERENCES catalog_refs(id) ON DELETE CASCADE,
    PRIMARY KEY (game_id, ref_id)
);
"#;

/// SQLite-backed [`CatalogStore`].
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `db_url` and ensure the
    /// schema exists.
    pub async fn open(db_url: &str) -> Result<Self, StoreError> {
        if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
            sqlx::Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;

        Self::from_pool(pool).await
    }

    /// In-memory store for tests. Pinned to one connection - every SQLite
    /// `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Load the relationship sets for a game row.
    async fn load_references(&self, game_id: i64) -> Result<Vec<Reference>, StoreError> {
        let rows: Vec<(i64, String, String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT r.id, r.kind, r.name, r.description
            FROM catalog_refs r
            JOIN game_refs gr ON gr.ref_id = r.id
            WHERE gr.game_id = ?
            ORDER BY r.name
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;

        let mut references = Vec::with_capacity(rows.len());
        for (id, kind, name, description) in rows {
            let kind = ReferenceKind::parse(&kind)
                .ok_or_else(|| StoreError::Backend(format!("unknown reference kind '{kind}'")))?;
            references.push(Reference {
                id,
                kind,
                name,
                description,
            });
        }
        Ok(references)
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn find_game_by_igdb_id(&self, igdb_id: i64) -> Result<Option<Game>, StoreError> {
        let row: Option<(i64, i64, String, Option<String>, Option<NaiveDate>, Option<String>)> =
            sqlx::query_as(
                "SELECT id, igdb_id, title, description, release_date, cover_url \
                 FROM games WHERE igdb_id = ?",
            )
            .bind(igdb_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some((id, igdb_id, title, description, release_date, cover_url)) = row else {
            return Ok(None);
        };

        let references = self.load_references(id).await?;
        let by_kind = |kind: ReferenceKind| {
            references
                .iter()
                .filter(|r| r.kind == kind)
                .cloned()
                .collect::<Vec<_>>()
        };

        Ok(Some(Game {
            id: Some(id),
            igdb_id,
            title,
            description,
            release_date,
            cover_url,
            genres: by_kind(ReferenceKind::Genre),
            platforms: by_kind(ReferenceKind::Platform),
            companies: by_kind(ReferenceKind::Company),
        }))
    }

    async fn game_exists(&self, igdb_id: i64) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM games WHERE igdb_id = ?)")
            .bind(igdb_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn save_game(&self, game: &Game) -> Result<Game, StoreError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO games (igdb_id, title, description, release_date, cover_url)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(igdb_id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                release_date = excluded.release_date,
                cover_url = excluded.cover_url
            RETURNING id
            "#,
        )
        .bind(game.igdb_id)
        .bind(&game.title)
        .bind(&game.description)
        .bind(game.release_date)
        .bind(&game.cover_url)
        .fetch_one(&mut *tx)
        .await?;

        // Replace the association rows wholesale; stale links go away.
        sqlx::query("DELETE FROM game_refs WHERE game_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for reference in game
            .genres
            .iter()
            .chain(&game.platforms)
            .chain(&game.companies)
        {
            sqlx::query("INSERT OR IGNORE INTO game_refs (game_id, ref_id) VALUES (?, ?)")
                .bind(id)
                .bind(reference.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let mut saved = game.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    async fn find_reference_by_name(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<Option<Reference>, StoreError> {
        let row: Option<(i64, String, Option<String>)> = sqlx::query_as(
            "SELECT id, name, description FROM catalog_refs \
             WHERE kind = ? AND name = ? COLLATE NOCASE",
        )
        .bind(kind.as_str())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name, description)| Reference {
            id,
            kind,
            name,
            description,
        }))
    }

    async fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
        description: Option<&str>,
    ) -> Result<Reference, StoreError> {
        let insert: Result<(i64,), sqlx::Error> = sqlx::query_as(
            "INSERT INTO catalog_refs (kind, name, description) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(kind.as_str())
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await;

        match insert {
            Ok((id,)) => Ok(Reference {
                id,
                kind,
                name: name.to_string(),
                description: description.map(String::from),
            }),
            // Lost a create race: the unique index fired, fetch the winner.
            Err(e) if is_unique_violation(&e) => self
                .find_reference_by_name(kind, name)
                .await?
                .ok_or(StoreError::Database(e)),
            Err(e) => Err(e.into()),
        }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

//! Test utilities and fixtures for game-minder tests.
//!
//! Provides record builders and an in-memory [`CatalogStore`] so service
//! tests run without SQLite.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use crate::catalog::domain::{Game, Reference, ReferenceKind};
use crate::catalog::igdb::dto;
use crate::store::{CatalogStore, StoreError};

/// A minimal game record with the given id and name.
pub fn sample_record(id: i64, name: &str) -> dto::GameRecord {
    dto::GameRecord {
        id,
        name: name.to_string(),
        summary: Some(format!("{name} summary")),
        ..Default::default()
    }
}

/// A record carrying the given genre names.
pub fn record_with_genres(id: i64, name: &str, genres: &[&str]) -> dto::GameRecord {
    let mut record = sample_record(id, name);
    record.genres = genres
        .iter()
        .enumerate()
        .map(|(i, g)| dto::GenreRecord {
            id: i as i64 + 1,
            name: g.to_string(),
            slug: None,
        })
        .collect();
    record
}

/// A company involvement with the given role flags.
pub fn involvement(
    company: &str,
    developer: bool,
    publisher: bool,
    porting: bool,
) -> dto::InvolvedCompanyRecord {
    dto::InvolvedCompanyRecord {
        id: 0,
        company: Some(dto::CompanyRecord {
            id: 0,
            name: company.to_string(),
            ..Default::default()
        }),
        developer,
        publisher,
        porting,
        supporting: false,
    }
}

/// In-memory [`CatalogStore`] with the same semantics as the SQLite store:
/// one game per igdb id, references unique by (kind, case-insensitive
/// name). Saves can be made to fail for a chosen igdb id to exercise
/// per-record failure handling.
pub struct InMemoryStore {
    games: Mutex<Vec<Game>>,
    references: Mutex<Vec<Reference>>,
    next_id: AtomicI64,
    fail_save_for: Mutex<Option<i64>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            games: Mutex::new(Vec::new()),
            references: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_save_for: Mutex::new(None),
        }
    }

    /// Make `save_game` fail for the record with this igdb id.
    pub fn fail_save_for(&self, igdb_id: i64) {
        *self.fail_save_for.lock().unwrap() = Some(igdb_id);
    }

    pub fn game_count(&self) -> usize {
        self.games.lock().unwrap().len()
    }

    pub fn reference_count(&self) -> usize {
        self.references.lock().unwrap().len()
    }

    fn fresh_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn find_game_by_igdb_id(&self, igdb_id: i64) -> Result<Option<Game>, StoreError> {
        let games = self.games.lock().unwrap();
        Ok(games.iter().find(|g| g.igdb_id == igdb_id).cloned())
    }

    async fn game_exists(&self, igdb_id: i64) -> Result<bool, StoreError> {
        let games = self.games.lock().unwrap();
        Ok(games.iter().any(|g| g.igdb_id == igdb_id))
    }

    async fn save_game(&self, game: &Game) -> Result<Game, StoreError> {
        if *self.fail_save_for.lock().unwrap() == Some(game.igdb_id) {
            return Err(StoreError::Backend("save rejected by test".to_string()));
        }

        let mut games = self.games.lock().unwrap();
        let mut saved = game.clone();
        match games.iter_mut().find(|g| g.igdb_id == game.igdb_id) {
            Some(existing) => {
                saved.id = existing.id;
                *existing = saved.clone();
            }
            None => {
                saved.id = Some(self.fresh_id());
                games.push(saved.clone());
            }
        }
        Ok(saved)
    }

    async fn find_reference_by_name(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<Option<Reference>, StoreError> {
        let references = self.references.lock().unwrap();
        Ok(references
            .iter()
            .find(|r| r.kind == kind && r.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
        description: Option<&str>,
    ) -> Result<Reference, StoreError> {
        let mut references = self.references.lock().unwrap();
        // Mirror the SQLite unique index: a lost race resolves to the winner.
        if let Some(existing) = references
            .iter()
            .find(|r| r.kind == kind && r.name.eq_ignore_ascii_case(name))
        {
            return Ok(existing.clone());
        }

        let reference = Reference {
            id: self.fresh_id(),
            kind,
            name: name.to_string(),
            description: description.map(String::from),
        };
        references.push(reference.clone());
        Ok(reference)
    }
}

//! Import service - orchestrates catalog fetches and reconciliation.
//!
//! This is the high-level API for pulling games into the library:
//! 1. Fetch records through the rate-limited, token-authenticated client
//! 2. Upsert each record against the store, keyed on its provider id
//! 3. Resolve genre/platform/company references via find-or-create
//! 4. Accumulate a per-batch report, isolating per-record failures
//!
//! Records are processed sequentially: a reference created for one record
//! must be visible to the find-or-create of the next.

use std::collections::HashSet;

use super::domain::{CatalogError, Game, ImportReport, RecordFailure, Reference, ReferenceKind};
use super::igdb::dto::GameRecord;
use super::igdb::{apply_record, to_new_game};
use super::traits::CatalogApi;
use crate::store::{CatalogStore, StoreError};

/// Orchestrates imports from the catalog provider into the store.
pub struct ImportService<C, S> {
    api: C,
    store: S,
}

impl<C: CatalogApi, S: CatalogStore> ImportService<C, S> {
    pub fn new(api: C, store: S) -> Self {
        Self { api, store }
    }

    /// Import games released within the last 30 days.
    pub async fn import_recent(&self, limit: u32) -> Result<ImportReport, CatalogError> {
        tracing::info!(limit, "Importing recently released games");
        let records = self.api.fetch_recent(limit).await?;
        Ok(self.import_batch(&records).await)
    }

    /// Import specific games by provider id.
    pub async fn import_by_ids(&self, ids: &[i64]) -> Result<ImportReport, CatalogError> {
        tracing::info!(count = ids.len(), "Importing games by id");
        let records = self.api.fetch_by_ids(ids).await?;
        Ok(self.import_batch(&records).await)
    }

    /// Search the provider and import the matches.
    pub async fn search_and_import(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<ImportReport, CatalogError> {
        tracing::info!(query, "Searching and importing games");
        let records = self.api.search(query, limit).await?;
        Ok(self.import_batch(&records).await)
    }

    /// Import the best-rated games with at least `min_rating_count` ratings.
    pub async fn import_top_rated(
        &self,
        limit: u32,
        min_rating_count: u32,
    ) -> Result<ImportReport, CatalogError> {
        tracing::info!(limit, min_rating_count, "Importing top rated games");
        let records = self.api.fetch_top_rated(limit, min_rating_count).await?;
        Ok(self.import_batch(&records).await)
    }

    /// Reconcile a batch of records into the store.
    ///
    /// Each record is handled independently; a failing record is reported
    /// and the batch continues. Fetch-level problems never reach this
    /// method - by the time records exist, the only failures left are
    /// per-record ones.
    pub async fn import_batch(&self, records: &[GameRecord]) -> ImportReport {
        let mut report = ImportReport::default();

        for record in records {
            match self.import_single(record).await {
                Ok((game, created)) => {
                    if created {
                        report.created += 1;
                    } else {
                        report.updated += 1;
                    }
                    report.games.push(game);
                }
                Err(e) => {
                    tracing::error!(
                        igdb_id = record.id,
                        name = %record.name,
                        error = %e,
                        "Failed to import game"
                    );
                    report.failures.push(RecordFailure {
                        igdb_id: record.id,
                        name: record.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            created = report.created,
            updated = report.updated,
            failed = report.failed(),
            total = records.len(),
            "Import completed"
        );

        report
    }

    /// Upsert one record with all its relationships.
    ///
    /// Returns the persisted game and whether it was newly created. The
    /// created/updated classification is decided before the save, by whether
    /// the entity already carried an internal id.
    async fn import_single(&self, record: &GameRecord) -> Result<(Game, bool), StoreError> {
        let mut game = match self.store.find_game_by_igdb_id(record.id).await? {
            Some(mut existing) => {
                tracing::debug!(igdb_id = record.id, name = %record.name, "Updating existing game");
                apply_record(record, &mut existing);
                existing
            }
            None => {
                tracing::debug!(igdb_id = record.id, name = %record.name, "Creating new game");
                to_new_game(record)
            }
        };
        let created = game.id.is_none();

        self.resolve_genres(record, &mut game).await?;
        self.resolve_platforms(record, &mut game).await?;
        self.resolve_companies(record, &mut game).await?;

        let saved = self.store.save_game(&game).await?;
        Ok((saved, created))
    }

    /// Resolve genre references and replace the game's genre set.
    ///
    /// A record without genres leaves the existing set untouched.
    async fn resolve_genres(&self, record: &GameRecord, game: &mut Game) -> Result<(), StoreError> {
        if record.genres.is_empty() {
            return Ok(());
        }

        let mut genres = Vec::with_capacity(record.genres.len());
        for genre in &record.genres {
            genres.push(
                self.find_or_create(ReferenceKind::Genre, &genre.name, None)
                    .await?,
            );
        }
        game.genres = dedup_by_id(genres);
        Ok(())
    }

    /// Resolve platform references and replace the game's platform set.
    async fn resolve_platforms(
        &self,
        record: &GameRecord,
        game: &mut Game,
    ) -> Result<(), StoreError> {
        if record.platforms.is_empty() {
            return Ok(());
        }

        let mut platforms = Vec::with_capacity(record.platforms.len());
        for platform in &record.platforms {
            platforms.push(
                self.find_or_create(ReferenceKind::Platform, &platform.name, None)
                    .await?,
            );
        }
        game.platforms = dedup_by_id(platforms);
        Ok(())
    }

    /// Resolve company references and replace the game's company set.
    ///
    /// Only developer/publisher involvements count; porting- or
    /// supporting-only involvements are dropped.
    async fn resolve_companies(
        &self,
        record: &GameRecord,
        game: &mut Game,
    ) -> Result<(), StoreError> {
        if record.involved_companies.is_empty() {
            return Ok(());
        }

        let mut companies = Vec::new();
        for involvement in &record.involved_companies {
            if !involvement.developer && !involvement.publisher {
                continue;
            }
            let Some(company) = &involvement.company else {
                continue;
            };
            if company.name.is_empty() {
                continue;
            }

            companies.push(
                self.find_or_create(
                    ReferenceKind::Company,
                    &company.name,
                    company.description.as_deref(),
                )
                .await?,
            );
        }
        game.companies = dedup_by_id(companies);
        Ok(())
    }

    /// Look up a reference by case-insensitive name, creating it on first
    /// encounter. Existing references are never updated.
    async fn find_or_create(
        &self,
        kind: ReferenceKind,
        name: &str,
        description: Option<&str>,
    ) -> Result<Reference, StoreError> {
        if let Some(reference) = self.store.find_reference_by_name(kind, name).await? {
            return Ok(reference);
        }

        tracing::debug!(%kind, name, "Creating new reference");
        self.store.create_reference(kind, name, description).await
    }
}

/// Drop references already seen, preserving first-seen order.
fn dedup_by_id(references: Vec<Reference>) -> Vec<Reference> {
    let mut seen = HashSet::new();
    references
        .into_iter()
        .filter(|r| seen.insert(r.id))
        .collect()
}

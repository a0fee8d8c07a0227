//! Trait definition for the catalog API client.
//!
//! The import service depends on this seam instead of the concrete HTTP
//! client, so tests substitute a mock that returns canned records or
//! errors.

use async_trait::async_trait;

use super::domain::CatalogError;
use super::igdb::IgdbClient;
use super::igdb::dto::GameRecord;
use super::token::TokenExchange;

/// The four read operations the provider exposes.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Games released within the last 30 days, newest first.
    async fn fetch_recent(&self, limit: u32) -> Result<Vec<GameRecord>, CatalogError>;

    /// Games by explicit provider id.
    async fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<GameRecord>, CatalogError>;

    /// Free-text search.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<GameRecord>, CatalogError>;

    /// Best-rated games with at least `min_rating_count` ratings.
    async fn fetch_top_rated(
        &self,
        limit: u32,
        min_rating_count: u32,
    ) -> Result<Vec<GameRecord>, CatalogError>;
}

#[async_trait]
impl<E: TokenExchange> CatalogApi for IgdbClient<E> {
    async fn fetch_recent(&self, limit: u32) -> Result<Vec<GameRecord>, CatalogError> {
        self.fetch_recent(limit).await
    }

    async fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<GameRecord>, CatalogError> {
        self.fetch_by_ids(ids).await
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<GameRecord>, CatalogError> {
        self.search(query, limit).await
    }

    async fn fetch_top_rated(
        &self,
        limit: u32,
        min_rating_count: u32,
    ) -> Result<Vec<GameRecord>, CatalogError> {
        self.fetch_top_rated(limit, min_rating_count).await
    }
}

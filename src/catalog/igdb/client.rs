//! IGDB HTTP client
//!
//! Handles communication with the IGDB API (https://api-docs.igdb.com).
//!
//! IGDB queries are plain-text bodies POSTed to an endpoint: a field
//! selection clause plus optional `where`/`sort`/`search` clauses and a
//! `limit`. Every request carries the `Client-ID` header and a Twitch OAuth2
//! bearer token.
//!
//! Every network call goes through the shared [`RateLimiter`] first and
//! fetches its token from the [`TokenManager`], so callers only ever see the
//! four query operations.

use chrono::Utc;

use super::dto;
use crate::catalog::domain::CatalogError;
use crate::catalog::rate_limit::RateLimiter;
use crate::catalog::token::{HttpTokenExchange, TokenExchange, TokenManager};

/// Fields requested for game data, with expanded nested objects.
const GAME_FIELDS: &str = "fields id, name, slug, summary, storyline, first_release_date, \
rating, rating_count, aggregated_rating, aggregated_rating_count, \
total_rating, total_rating_count, url, \
cover.*, genres.*, platforms.*, involved_companies.*, involved_companies.company.*;\n";

const THIRTY_DAYS_SECS: i64 = 30 * 24 * 60 * 60;

/// IGDB API client.
pub struct IgdbClient<E = HttpTokenExchange> {
    http_client: reqwest::Client,
    base_url: String,
    client_id: String,
    tokens: TokenManager<E>,
    limiter: RateLimiter,
}

impl IgdbClient<HttpTokenExchange> {
    /// Create a client against the given base and auth URLs.
    pub fn new(
        base_url: impl Into<String>,
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let client_id = client_id.into();
        let exchange = HttpTokenExchange::new(auth_url, client_id.clone(), client_secret);
        Self::with_token_manager(base_url, client_id, TokenManager::new(exchange))
    }
}

impl<E: TokenExchange> IgdbClient<E> {
    /// Create a client with an externally built token manager.
    ///
    /// Tests use this to inject a fake exchange.
    pub fn with_token_manager(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        tokens: TokenManager<E>,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
            client_id: client_id.into(),
            tokens,
            limiter: RateLimiter::per_second(),
        }
    }

    /// Fetch games released within the last 30 days, newest first.
    pub async fn fetch_recent(&self, limit: u32) -> Result<Vec<dto::GameRecord>, CatalogError> {
        tracing::info!(limit, "Fetching recently released games");
        self.execute(&recent_query(limit, Utc::now().timestamp()))
            .await
    }

    /// Fetch specific games by IGDB id.
    ///
    /// An empty id list short-circuits to an empty result without touching
    /// the network.
    pub async fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<dto::GameRecord>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!(count = ids.len(), "Fetching games by id");
        self.execute(&ids_query(ids)).await
    }

    /// Free-text search. A blank query short-circuits to an empty result.
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<dto::GameRecord>, CatalogError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!(query, "Searching games");
        self.execute(&search_query(query, limit)).await
    }

    /// Fetch the highest-rated games with at least `min_rating_count`
    /// ratings, best first.
    pub async fn fetch_top_rated(
        &self,
        limit: u32,
        min_rating_count: u32,
    ) -> Result<Vec<dto::GameRecord>, CatalogError> {
        tracing::info!(limit, min_rating_count, "Fetching top rated games");
        self.execute(&top_rated_query(limit, min_rating_count))
            .await
    }

    /// Acquire a rate-limit slot, attach credentials, POST the query, and
    /// parse the response body.
    async fn execute(&self, query: &str) -> Result<Vec<dto::GameRecord>, CatalogError> {
        self.limiter.acquire_default().await?;
        let token = self.tokens.bearer_token().await?;

        tracing::debug!(query = %query.replace('\n', " "), "Executing IGDB query");

        let response = self
            .http_client
            .post(format!("{}/games", self.base_url))
            .header("Client-ID", &self.client_id)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .bearer_auth(&token)
            .body(query.to_string())
            .send()
            .await
            .map_err(|e| CatalogError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Api(e.to_string()))?;

        // IGDB answers some queries with an empty body instead of [].
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<dto::GameRecord> =
            serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))?;

        tracing::debug!(count = records.len(), "IGDB returned games");
        Ok(records)
    }
}

fn recent_query(limit: u32, now_epoch: i64) -> String {
    let thirty_days_ago = now_epoch - THIRTY_DAYS_SECS;
    format!(
        "{GAME_FIELDS}where first_release_date >= {thirty_days_ago} & first_release_date <= {now_epoch};\n\
         sort first_release_date desc;\nlimit {limit};\n"
    )
}

fn ids_query(ids: &[i64]) -> String {
    let id_list = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{GAME_FIELDS}where id = ({id_list});\nlimit {};\n",
        ids.len()
    )
}

fn search_query(query: &str, limit: u32) -> String {
    format!(
        "{GAME_FIELDS}search \"{}\";\nlimit {limit};\n",
        escape_search(query)
    )
}

fn top_rated_query(limit: u32, min_rating_count: u32) -> String {
    format!(
        "{GAME_FIELDS}where total_rating_count >= {min_rating_count} & total_rating != null;\n\
         sort total_rating desc;\nlimit {limit};\n"
    )
}

/// Escape characters that would break out of the quoted search term.
fn escape_search(query: &str) -> String {
    query.replace('\\', "\\\\").replace('"', "\\\"")
}

//! Internal domain models for catalog import.
//!
//! These types are OUR types - they don't change when the provider API
//! changes. All external API responses get converted into these types via
//! the provider adapter.

use chrono::NaiveDate;

/// A game in the local library.
///
/// `id` is assigned by the store on first persist and stays `None` until
/// then. `igdb_id` is the provider-assigned identifier and the sole
/// reconciliation key - the store enforces at most one row per `igdb_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Game {
    /// Internal identity, storage-assigned
    pub id: Option<i64>,
    /// Provider-assigned identifier (unique)
    pub igdb_id: i64,
    /// Game title
    pub title: String,
    /// Long-form description
    pub description: Option<String>,
    /// First release date, in the local time zone
    pub release_date: Option<NaiveDate>,
    /// Cover image URL
    pub cover_url: Option<String>,
    /// Associated genres
    pub genres: Vec<Reference>,
    /// Associated platforms
    pub platforms: Vec<Reference>,
    /// Developers and publishers
    pub companies: Vec<Reference>,
}

/// A shared lookup entity (genre, platform, or company).
///
/// References are unique by (kind, case-insensitive name), created lazily on
/// first encounter and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id: i64,
    pub kind: ReferenceKind,
    pub name: String,
    /// Only companies carry a description
    pub description: Option<String>,
}

/// The three reference entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Genre,
    Platform,
    Company,
}

impl ReferenceKind {
    /// Stable storage discriminator
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Genre => "genre",
            ReferenceKind::Platform => "platform",
            ReferenceKind::Company => "company",
        }
    }

    /// Inverse of [`as_str`](Self::as_str), for rows read back from storage.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "genre" => Some(ReferenceKind::Genre),
            "platform" => Some(ReferenceKind::Platform),
            "company" => Some(ReferenceKind::Company),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record that could not be imported.
///
/// Per-record failures are values in the report, not exceptions - a bad
/// record never aborts the rest of its batch.
#[derive(Debug, Clone)]
pub struct RecordFailure {
    /// Provider id of the failed record
    pub igdb_id: i64,
    /// Record name, for log/report readability
    pub name: String,
    /// Human-readable failure cause
    pub reason: String,
}

/// Aggregate result of one import batch.
///
/// Transient - returned to the caller, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Records persisted for the first time
    pub created: usize,
    /// Records that updated an existing game
    pub updated: usize,
    /// Records that failed, in processing order
    pub failures: Vec<RecordFailure>,
    /// Successfully persisted games, in processing order
    pub games: Vec<Game>,
}

impl ImportReport {
    /// Number of failed records.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Total records processed.
    pub fn total(&self) -> usize {
        self.created + self.updated + self.failures.len()
    }
}

/// Errors from the catalog provider side (token exchange, rate limiting,
/// transport). All of these are fatal to the in-flight operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("token exchange failed: {0}")]
    Auth(String),

    #[error("timed out waiting for a request slot")]
    RateLimitTimeout,

    #[error("catalog request failed: {0}")]
    Api(String),

    #[error("failed to parse catalog response: {0}")]
    Parse(String),
}

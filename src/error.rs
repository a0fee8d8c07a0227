//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`CatalogError`], [`StoreError`]); this module aggregates them for the
//! CLI layer, while the binary entry point uses `anyhow` for convenient
//! propagation.

use crate::catalog::domain::CatalogError;
use crate::store::StoreError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog provider error (auth, rate limiting, transport)
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Storage error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

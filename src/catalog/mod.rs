//! Catalog import module - pulls game records from the provider and
//! reconciles them into the local library.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`igdb/dto.rs`) - Exact API response shapes
//! - **Adapter** (`igdb/adapter.rs`) - Converts DTOs to domain models
//! - **Client** (`igdb/client.rs`) - HTTP client for the provider API
//! - **Token** (`token.rs`) - Bearer-token lifecycle with automatic refresh
//! - **Rate limit** (`rate_limit.rs`) - Outbound token-bucket throttle
//! - **Service** (`service.rs`) - High-level orchestration of the import flow
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test the import algorithm against in-memory fakes
//! 3. We can swap providers without changing business logic

pub mod domain;
pub mod igdb;
pub mod rate_limit;
pub mod service;
pub mod token;
pub mod traits;

pub use domain::{CatalogError, Game, ImportReport, RecordFailure, Reference, ReferenceKind};
pub use igdb::IgdbClient;
pub use rate_limit::RateLimiter;
pub use service::ImportService;
pub use token::{HttpTokenExchange, TokenManager};

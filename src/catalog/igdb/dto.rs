//! IGDB API Data Transfer Objects
//!
//! These types match EXACTLY what the IGDB API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the igdb module - convert to domain types.
//!
//! API Reference: https://api-docs.igdb.com/#game
//!
//! Responses are JSON arrays of game objects. serde ignores unknown fields
//! by default, which keeps the client forward-compatible when IGDB adds
//! fields.

use serde::{Deserialize, Serialize};

/// One game as returned by the /games endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GameRecord {
    /// IGDB game id (stable, provider-assigned)
    pub id: i64,
    /// Game title
    #[serde(default)]
    pub name: String,
    /// URL-safe short name
    pub slug: Option<String>,
    /// Primary long-form text
    pub summary: Option<String>,
    /// Secondary narrative text
    pub storyline: Option<String>,
    /// First release, in epoch seconds
    pub first_release_date: Option<i64>,
    /// IGDB user rating (0-100)
    pub rating: Option<f64>,
    /// Number of IGDB user ratings
    pub rating_count: Option<i64>,
    /// External critic rating (0-100)
    pub aggregated_rating: Option<f64>,
    /// Number of external critic ratings
    pub aggregated_rating_count: Option<i64>,
    /// Combined rating (0-100)
    pub total_rating: Option<f64>,
    /// Number of ratings behind `total_rating`
    pub total_rating_count: Option<i64>,
    /// Cover image
    pub cover: Option<CoverRecord>,
    /// Genres (expanded)
    #[serde(default)]
    pub genres: Vec<GenreRecord>,
    /// Platforms (expanded)
    #[serde(default)]
    pub platforms: Vec<PlatformRecord>,
    /// Company involvements (expanded)
    #[serde(default)]
    pub involved_companies: Vec<InvolvedCompanyRecord>,
    /// IGDB page URL
    pub url: Option<String>,
}

/// Cover image info.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CoverRecord {
    pub id: i64,
    /// Identifier used to build image URLs
    pub image_id: Option<String>,
    /// Thumbnail URL as returned by IGDB (protocol-relative)
    pub url: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// Genre info.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenreRecord {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
}

/// Platform info.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformRecord {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub abbreviation: Option<String>,
}

/// A company's involvement in a game (developer, publisher, porting,
/// supporting). Only developer/publisher involvements matter for import.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InvolvedCompanyRecord {
    pub id: i64,
    pub company: Option<CompanyRecord>,
    #[serde(default)]
    pub developer: bool,
    #[serde(default)]
    pub publisher: bool,
    #[serde(default)]
    pub porting: bool,
    #[serde(default)]
    pub supporting: bool,
}

/// Company info.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CompanyRecord {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

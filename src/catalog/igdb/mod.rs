//! IGDB API integration
//!
//! Game catalog data comes from IGDB (https://api-docs.igdb.com),
//! authenticated through Twitch OAuth2 client credentials and throttled by
//! the shared rate limiter.

pub mod dto;
mod adapter;
mod client;

pub use adapter::{apply_record, to_new_game};
pub use client::IgdbClient;

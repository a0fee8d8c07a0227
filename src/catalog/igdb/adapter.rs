//! Adapter layer: Convert IGDB DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if IGDB changes their response format, only
//! this file and dto.rs need to change.
//!
//! Relationship sets (genres/platforms/companies) are NOT handled here -
//! resolving those against the store is the import service's job.

use chrono::{Local, NaiveDate, TimeZone};

use super::dto;
use crate::catalog::domain::Game;

/// Image size slot in IGDB's URL template. 264x374, the detail-page size.
const COVER_SIZE: &str = "cover_big";

/// Build a new [`Game`] from a record.
///
/// The entity has no internal id yet; the store assigns one on first
/// persist.
pub fn to_new_game(record: &dto::GameRecord) -> Game {
    let mut game = Game::default();
    apply_record(record, &mut game);
    game
}

/// Overwrite a game's mapped fields from a record, in place.
///
/// Used on re-import so a game tracks the provider's current data.
pub fn apply_record(record: &dto::GameRecord, game: &mut Game) {
    game.igdb_id = record.id;
    game.title = record.name.clone();
    game.description = description_of(record);
    game.release_date = record.first_release_date.and_then(to_local_date);
    game.cover_url = record.cover.as_ref().and_then(cover_url);
}

/// Primary text if non-blank, else the narrative text, else nothing.
fn description_of(record: &dto::GameRecord) -> Option<String> {
    non_blank(record.summary.as_deref()).or_else(|| non_blank(record.storyline.as_deref()))
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty()).map(String::from)
}

/// Epoch seconds to a calendar date in the system's local time zone.
fn to_local_date(timestamp: i64) -> Option<NaiveDate> {
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.date_naive())
}

/// Full image URL for a cover, using IGDB's upload URL template.
fn cover_url(cover: &dto::CoverRecord) -> Option<String> {
    cover.image_id.as_ref().map(|image_id| {
        format!("https://images.igdb.com/igdb/image/upload/t_{COVER_SIZE}/{image_id}.jpg")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(name: &str) -> dto::GameRecord {
        dto::GameRecord {
            id: 42,
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_maps_basic_fields() {
        let mut r = record("Hollow Knight");
        r.summary = Some("A challenging action adventure.".to_string());
        r.first_release_date = Some(1487894400); // 2017-02-24 UTC
        r.cover = Some(dto::CoverRecord {
            id: 1,
            image_id: Some("co1rgi".to_string()),
            ..Default::default()
        });

        let game = to_new_game(&r);

        assert_eq!(game.id, None);
        assert_eq!(game.igdb_id, 42);
        assert_eq!(game.title, "Hollow Knight");
        assert_eq!(
            game.description.as_deref(),
            Some("A challenging action adventure.")
        );
        assert_eq!(
            game.cover_url.as_deref(),
            Some("https://images.igdb.com/igdb/image/upload/t_cover_big/co1rgi.jpg")
        );
        assert_eq!(game.release_date, to_local_date(1487894400));
    }

    #[test]
    fn test_description_falls_back_to_storyline() {
        let mut r = record("Fallback");
        r.summary = Some("   ".to_string());
        r.storyline = Some("The long version.".to_string());

        let game = to_new_game(&r);
        assert_eq!(game.description.as_deref(), Some("The long version."));
    }

    #[test]
    fn test_description_absent_when_both_blank() {
        let mut r = record("Blank");
        r.summary = Some(String::new());
        r.storyline = None;

        assert_eq!(to_new_game(&r).description, None);
    }

    #[test]
    fn test_missing_timestamp_and_cover_map_to_none() {
        let game = to_new_game(&record("Sparse"));
        assert_eq!(game.release_date, None);
        assert_eq!(game.cover_url, None);
    }

    #[test]
    fn test_cover_without_image_id_maps_to_none() {
        let mut r = record("No Image");
        r.cover = Some(dto::CoverRecord {
            id: 9,
            image_id: None,
            ..Default::default()
        });

        assert_eq!(to_new_game(&r).cover_url, None);
    }

    #[test]
    fn test_apply_record_overwrites_fields_but_not_relationships() {
        let mut game = to_new_game(&record("Old Title"));
        game.id = Some(7);
        game.genres = vec![crate::catalog::domain::Reference {
            id: 1,
            kind: crate::catalog::domain::ReferenceKind::Genre,
            name: "RPG".to_string(),
            description: None,
        }];

        let mut r = record("New Title");
        r.summary = Some("Fresh text.".to_string());
        apply_record(&r, &mut game);

        assert_eq!(game.id, Some(7));
        assert_eq!(game.title, "New Title");
        assert_eq!(game.description.as_deref(), Some("Fresh text."));
        assert_eq!(game.genres.len(), 1);
    }

    proptest! {
        // Whatever the text fields hold, the description is never blank.
        #[test]
        fn prop_description_never_blank(summary in ".{0,40}", storyline in ".{0,40}") {
            let mut r = record("Prop");
            r.summary = Some(summary);
            r.storyline = Some(storyline);

            if let Some(d) = to_new_game(&r).description {
                prop_assert!(!d.trim().is_empty());
            }
        }

        // Every representable timestamp converts to a date without panicking.
        #[test]
        fn prop_timestamp_conversion_is_total(ts in -8_000_000_000i64..8_000_000_000i64) {
            let mut r = record("Prop");
            r.first_release_date = Some(ts);
            let _ = to_new_game(&r).release_date;
        }
    }
}

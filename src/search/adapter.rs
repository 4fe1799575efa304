//! Adapter layer: filter raw results and convert DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::domain::{Album, Artist, Filters, Track};
use super::dto::ResultItem;
use crate::error::{ItunesError, Result};

/// Keep only the result objects that satisfy every filter
pub fn apply_filters(results: Vec<Value>, filters: &Filters) -> Vec<Value> {
    if filters.is_empty() {
        return results;
    }
    results
        .into_iter()
        .filter(|item| matches_filters(item, filters))
        .collect()
}

/// Whether a single result object satisfies every filter.
///
/// Missing fields never match. Strings compare trimmed and case-insensitively;
/// a string filter also matches a number field with the same digits.
pub fn matches_filters(item: &Value, filters: &Filters) -> bool {
    filters.iter().all(|(key, expected)| match item.get(key) {
        Some(actual) => values_match(actual, expected),
        None => false,
    })
}

fn values_match(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(a), Value::String(e)) => a.trim().to_lowercase() == e.trim().to_lowercase(),
        (Value::Number(a), Value::String(e)) => a.to_string() == e.trim(),
        _ => actual == expected,
    }
}

/// Decode raw result objects into tracks. Items without a `trackId` are skipped.
pub fn to_tracks(results: Vec<Value>) -> Result<Vec<Track>> {
    Ok(decode_items(results)?
        .into_iter()
        .filter_map(to_track)
        .collect())
}

/// Decode raw result objects into albums. Items without a `collectionId` are skipped.
pub fn to_albums(results: Vec<Value>) -> Result<Vec<Album>> {
    Ok(decode_items(results)?
        .into_iter()
        .filter_map(to_album)
        .collect())
}

/// Decode raw result objects into artists. Items without an `artistId` are skipped.
pub fn to_artists(results: Vec<Value>) -> Result<Vec<Artist>> {
    Ok(decode_items(results)?
        .into_iter()
        .filter_map(to_artist)
        .collect())
}

fn decode_items(results: Vec<Value>) -> Result<Vec<ResultItem>> {
    results
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_path_to_error::deserialize::<_, ResultItem>(value).map_err(|e| ItunesError::Parse {
                path: format!("results[{}].{}", index, e.path()),
                message: e.into_inner().to_string(),
            })
        })
        .collect()
}

fn to_track(item: ResultItem) -> Option<Track> {
    let Some(id) = item.track_id else {
        tracing::debug!("Skipping track result without trackId");
        return None;
    };

    Some(Track {
        id,
        name: item
            .track_name
            .or(item.track_censored_name)
            .unwrap_or_default(),
        artist_id: item.artist_id,
        artist_name: item.artist_name,
        album_id: item.collection_id,
        album_name: item.collection_name.or(item.collection_censored_name),
        track_number: item.track_number,
        track_count: item.track_count,
        disc_number: item.disc_number,
        duration: item.track_time_millis.map(Duration::from_millis),
        genre: item.primary_genre_name,
        release_date: parse_release_date(item.release_date.as_deref()),
        explicit: is_explicit(item.track_explicitness.as_deref()),
        price: item.track_price,
        currency: item.currency,
        preview_url: item.preview_url,
        view_url: item.track_view_url,
        artwork_url: item.artwork_url100.or(item.artwork_url60),
    })
}

fn to_album(item: ResultItem) -> Option<Album> {
    let Some(id) = item.collection_id else {
        tracing::debug!("Skipping album result without collectionId");
        return None;
    };

    Some(Album {
        id,
        name: item
            .collection_name
            .or(item.collection_censored_name)
            .unwrap_or_default(),
        artist_id: item.artist_id,
        artist_name: item.artist_name,
        track_count: item.track_count,
        genre: item.primary_genre_name,
        release_date: parse_release_date(item.release_date.as_deref()),
        explicit: is_explicit(item.collection_explicitness.as_deref()),
        price: item.collection_price,
        currency: item.currency,
        copyright: item.copyright,
        view_url: item.collection_view_url,
        artwork_url: item.artwork_url100.or(item.artwork_url60),
    })
}

fn to_artist(item: ResultItem) -> Option<Artist> {
    let Some(id) = item.artist_id else {
        tracing::debug!("Skipping artist result without artistId");
        return None;
    };

    Some(Artist {
        id,
        name: item.artist_name.unwrap_or_default(),
        genre: item.primary_genre_name,
        amg_id: item.amg_artist_id,
        link_url: item.artist_link_url.or(item.artist_view_url),
    })
}

fn parse_release_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!("Unparseable releaseDate {:?}: {}", raw, e);
            None
        }
    }
}

fn is_explicit(explicitness: Option<&str>) -> bool {
    matches!(explicitness, Some("explicit"))
}

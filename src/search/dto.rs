//! iTunes Search API Data Transfer Objects
//!
//! These types match what the API returns. Do not use them outside the
//! `search` module - the adapter converts them into domain types.
//!
//! API Reference: https://performance-partners.apple.com/search-api
//!
//! Both `/search` and `/lookup` answer with the same envelope:
//! `{"resultCount": N, "results": [...]}`. Each result is a loosely-typed
//! object whose shape depends on `wrapperType` (`track`, `collection`,
//! `artist`). We keep the raw objects in the envelope so caller-supplied
//! filters can inspect any field, and decode [`ResultItem`] per object later.

use serde::{Deserialize, Serialize};

/// Response envelope shared by search and lookup
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Number of results the API says it returned
    pub result_count: u32,
    /// Raw result objects
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// A single result object
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    /// `track`, `collection` or `artist`
    pub wrapper_type: Option<String>,
    /// Finer media kind for tracks (`song`, `music-video`, ...)
    pub kind: Option<String>,
    /// Artist type for artist results (`Artist`, ...)
    pub artist_type: Option<String>,

    pub artist_id: Option<u64>,
    pub collection_id: Option<u64>,
    pub track_id: Option<u64>,
    pub amg_artist_id: Option<u64>,

    pub artist_name: Option<String>,
    pub collection_name: Option<String>,
    pub track_name: Option<String>,
    pub collection_censored_name: Option<String>,
    pub track_censored_name: Option<String>,

    pub artist_view_url: Option<String>,
    /// Artist results use this instead of `artistViewUrl`
    pub artist_link_url: Option<String>,
    pub collection_view_url: Option<String>,
    pub track_view_url: Option<String>,
    pub preview_url: Option<String>,
    pub artwork_url60: Option<String>,
    pub artwork_url100: Option<String>,

    pub collection_price: Option<f64>,
    pub track_price: Option<f64>,
    pub currency: Option<String>,
    pub country: Option<String>,

    /// ISO 8601 timestamp, e.g. `2005-01-01T08:00:00Z`
    pub release_date: Option<String>,
    pub collection_explicitness: Option<String>,
    pub track_explicitness: Option<String>,
    pub disc_count: Option<u32>,
    pub disc_number: Option<u32>,
    pub track_count: Option<u32>,
    pub track_number: Option<u32>,
    pub track_time_millis: Option<u64>,
    pub primary_genre_name: Option<String>,
    pub primary_genre_id: Option<u64>,
    pub copyright: Option<String>,
}

/// Error body returned with 4xx responses
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error_message: String,
    #[serde(default)]
    pub query_parameters: Option<serde_json::Value>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_empty_envelope() {
        let json = r#"{"resultCount": 0, "results": []}"#;
        let response: SearchResponse = serde_json::from_str(json).expect("Should parse");
        assert_eq!(response.result_count, 0);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_parse_envelope_without_results_field() {
        let json = r#"{"resultCount": 0}"#;
        let response: SearchResponse = serde_json::from_str(json).expect("Should parse");
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_parse_track_item() {
        let json = r#"{
            "wrapperType": "track",
            "kind": "song",
            "artistId": 909253,
            "collectionId": 879273552,
            "trackId": 879273565,
            "artistName": "Jack Johnson",
            "collectionName": "In Between Dreams",
            "trackName": "Better Together",
            "collectionCensoredName": "In Between Dreams",
            "trackCensoredName": "Better Together",
            "artistViewUrl": "https://music.apple.com/us/artist/jack-johnson/909253",
            "previewUrl": "https://audio-ssl.itunes.apple.com/preview.m4a",
            "artworkUrl100": "https://is1-ssl.mzstatic.com/100x100bb.jpg",
            "collectionPrice": 9.99,
            "trackPrice": 1.29,
            "releaseDate": "2005-03-01T08:00:00Z",
            "collectionExplicitness": "notExplicit",
            "trackExplicitness": "notExplicit",
            "discCount": 1,
            "discNumber": 1,
            "trackCount": 15,
            "trackNumber": 1,
            "trackTimeMillis": 207679,
            "country": "USA",
            "currency": "USD",
            "primaryGenreName": "Rock",
            "isStreamable": true
        }"#;

        let item: ResultItem = serde_json::from_str(json).expect("Should parse track");
        assert_eq!(item.wrapper_type.as_deref(), Some("track"));
        assert_eq!(item.track_id, Some(879273565));
        assert_eq!(item.track_name.as_deref(), Some("Better Together"));
        assert_eq!(item.track_time_millis, Some(207679));
        assert_eq!(item.track_price, Some(1.29));
    }

    #[test]
    fn test_parse_collection_item() {
        let json = r#"{
            "wrapperType": "collection",
            "collectionType": "Album",
            "artistId": 909253,
            "collectionId": 879273552,
            "artistName": "Jack Johnson",
            "collectionName": "In Between Dreams",
            "collectionViewUrl": "https://music.apple.com/us/album/in-between-dreams/879273552",
            "artworkUrl60": "https://is1-ssl.mzstatic.com/60x60bb.jpg",
            "collectionPrice": 9.99,
            "trackCount": 15,
            "copyright": "℗ 2005 Jack Johnson",
            "country": "USA",
            "releaseDate": "2005-03-01T08:00:00Z",
            "primaryGenreName": "Rock"
        }"#;

        let item: ResultItem = serde_json::from_str(json).expect("Should parse album");
        assert_eq!(item.wrapper_type.as_deref(), Some("collection"));
        assert_eq!(item.collection_id, Some(879273552));
        assert_eq!(item.track_count, Some(15));
        assert!(item.track_id.is_none());
    }

    #[test]
    fn test_parse_artist_item() {
        let json = r#"{
            "wrapperType": "artist",
            "artistType": "Artist",
            "artistName": "Jack Johnson",
            "artistLinkUrl": "https://music.apple.com/us/artist/jack-johnson/909253",
            "artistId": 909253,
            "amgArtistId": 468749,
            "primaryGenreName": "Rock",
            "primaryGenreId": 21
        }"#;

        let item: ResultItem = serde_json::from_str(json).expect("Should parse artist");
        assert_eq!(item.wrapper_type.as_deref(), Some("artist"));
        assert_eq!(item.artist_id, Some(909253));
        assert_eq!(item.amg_artist_id, Some(468749));
        assert!(item.artist_link_url.is_some());
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{
            "errorMessage": "Invalid value(s) for key(s): [entity]",
            "queryParameters": {"entity": "bogus", "term": "jack"}
        }"#;

        let error: ApiError = serde_json::from_str(json).expect("Should parse error");
        assert_eq!(error.error_message, "Invalid value(s) for key(s): [entity]");
        assert!(error.query_parameters.is_some());
    }
}

//! Test utilities and fixtures for itunes-search tests.
//!
//! HTTP tests run against a `wiremock` server. The helpers here mount canned
//! responses shaped like the real API, and the JSON fixtures mirror real
//! result objects.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{serve, envelope, album_json};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let server = serve("/lookup", 200, envelope(vec![album_json(1, "A", "X")])).await;
//!     // point a client at server.uri()
//! }
//! ```

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A response with the content type the API actually sends
pub fn api_response(status: u16, body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.into(), "text/javascript; charset=utf-8")
}

/// Start a server answering every GET to `endpoint` with `status` and `body`.
pub async fn serve(endpoint: &str, status: u16, body: impl Into<String>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(api_response(status, body))
        .mount(&server)
        .await;
    server
}

/// Request targets (path + query) the server received, in order.
pub async fn request_targets(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| match request.url.query() {
            Some(query) => format!("{}?{}", request.url.path(), query),
            None => request.url.path().to_string(),
        })
        .collect()
}

/// Wrap result objects in the API envelope and serialize it.
pub fn envelope(results: Vec<Value>) -> String {
    json!({
        "resultCount": results.len(),
        "results": results,
    })
    .to_string()
}

/// A `track` result object.
pub fn track_json(track_id: u64, collection_id: u64, name: &str, artist: &str) -> Value {
    json!({
        "wrapperType": "track",
        "kind": "song",
        "artistId": 909253,
        "collectionId": collection_id,
        "trackId": track_id,
        "artistName": artist,
        "collectionName": "In Between Dreams",
        "trackName": name,
        "trackViewUrl": format!("https://music.apple.com/us/album/{collection_id}?i={track_id}"),
        "previewUrl": "https://audio-ssl.itunes.apple.com/preview.m4a",
        "artworkUrl100": "https://is1-ssl.mzstatic.com/100x100bb.jpg",
        "trackPrice": 1.29,
        "currency": "USD",
        "releaseDate": "2005-03-01T08:00:00Z",
        "trackExplicitness": "notExplicit",
        "discCount": 1,
        "discNumber": 1,
        "trackCount": 15,
        "trackNumber": 1,
        "trackTimeMillis": 207679,
        "primaryGenreName": "Rock"
    })
}

/// A `collection` (album) result object.
pub fn album_json(collection_id: u64, name: &str, artist: &str) -> Value {
    json!({
        "wrapperType": "collection",
        "collectionType": "Album",
        "artistId": 909253,
        "collectionId": collection_id,
        "artistName": artist,
        "collectionName": name,
        "collectionViewUrl": format!("https://music.apple.com/us/album/{collection_id}"),
        "artworkUrl100": "https://is1-ssl.mzstatic.com/100x100bb.jpg",
        "collectionPrice": 9.99,
        "collectionExplicitness": "notExplicit",
        "trackCount": 15,
        "copyright": "℗ 2005 Test Records",
        "currency": "USD",
        "releaseDate": "2005-03-01T08:00:00Z",
        "primaryGenreName": "Rock"
    })
}

/// An `artist` result object.
pub fn artist_json(artist_id: u64, name: &str) -> Value {
    json!({
        "wrapperType": "artist",
        "artistType": "Artist",
        "artistName": name,
        "artistLinkUrl": format!("https://music.apple.com/us/artist/{artist_id}"),
        "artistId": artist_id,
        "amgArtistId": 468749,
        "primaryGenreName": "Rock",
        "primaryGenreId": 21
    })
}

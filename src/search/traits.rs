//! Trait definition for the search API client.
//!
//! Lets callers (including our own CLI commands) take any implementation,
//! so tests can substitute a mock instead of hitting the network.
//!
//! # Example
//!
//! ```ignore
//! use itunes_search::search::ItunesApi;
//!
//! async fn discography<T: ItunesApi>(api: &T, artist_id: u64) -> itunes_search::Result<usize> {
//!     Ok(api.get_albums_for_artist(artist_id, None).await?.len())
//! }
//! ```

use async_trait::async_trait;
use serde_json::Value;

use super::domain::{Album, ApiMethod, Artist, Filters, Params, Track};
use crate::error::Result;

/// Operations offered by the iTunes Search API client.
#[async_trait]
pub trait ItunesApi: Send + Sync {
    /// Generic call returning filtered raw result objects.
    async fn perform_api_call(
        &self,
        method: ApiMethod,
        params: Params,
        filters: Filters,
    ) -> Result<Vec<Value>>;

    async fn get_tracks_for_albums(&self, album_ids: &[u64], limit: Option<u32>)
    -> Result<Vec<Track>>;

    async fn get_albums_for_artist(&self, artist_id: u64, limit: Option<u32>)
    -> Result<Vec<Album>>;

    async fn get_album_with_artist(
        &self,
        artist_name: &str,
        album_name: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Album>>;

    async fn get_id_for_artist(&self, artist_name: &str) -> Result<Vec<Artist>>;

    async fn search_tracks(&self, term: &str, limit: Option<u32>) -> Result<Vec<Track>>;
}

#[async_trait]
impl ItunesApi for super::client::ItunesClient {
    async fn perform_api_call(
        &self,
        method: ApiMethod,
        params: Params,
        filters: Filters,
    ) -> Result<Vec<Value>> {
        self.perform_api_call(method, params, filters).await
    }

    async fn get_tracks_for_albums(
        &self,
        album_ids: &[u64],
        limit: Option<u32>,
    ) -> Result<Vec<Track>> {
        self.get_tracks_for_albums(album_ids, limit).await
    }

    async fn get_albums_for_artist(
        &self,
        artist_id: u64,
        limit: Option<u32>,
    ) -> Result<Vec<Album>> {
        self.get_albums_for_artist(artist_id, limit).await
    }

    async fn get_album_with_artist(
        &self,
        artist_name: &str,
        album_name: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Album>> {
        self.get_album_with_artist(artist_name, album_name, limit)
            .await
    }

    async fn get_id_for_artist(&self, artist_name: &str) -> Result<Vec<Artist>> {
        self.get_id_for_artist(artist_name).await
    }

    async fn search_tracks(&self, term: &str, limit: Option<u32>) -> Result<Vec<Track>> {
        self.search_tracks(term, limit).await
    }
}

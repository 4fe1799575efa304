//! itunes-search - a typed async client for the iTunes Search API.
//!
//! Every operation turns its arguments into a `search` or `lookup` query,
//! makes one GET against `https://itunes.apple.com`, decodes the JSON
//! envelope and returns either the results or an [`ItunesError`].
//!
//! # Usage
//!
//! ```ignore
//! use itunes_search::{ClientSettings, ItunesClient};
//!
//! let client = ItunesClient::new(ClientSettings {
//!     country: Some("GB".to_string()),
//!     ..Default::default()
//! });
//!
//! let artists = client.get_id_for_artist("Jack Johnson").await?;
//! let albums = client.get_albums_for_artist(artists[0].id, Some(10)).await?;
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod search;
#[cfg(test)]
pub mod test_utils;

pub use cache::{CachedResponse, DiskCache, MemoryCache, ResponseCache};
pub use error::{ItunesError, Result};
pub use search::{
    Affiliate, Album, ApiMethod, Artist, ClientSettings, ItunesApi, ItunesClient, Track, shared,
};

//! Internal domain models for search requests and results.
//!
//! These types are OUR types - they don't change when the API changes.
//! API responses get converted into these types via the adapter.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

/// Query parameters for a single call, ordered by key.
pub type Params = BTreeMap<String, String>;

/// Field filters applied to raw result objects, ordered by key.
pub type Filters = BTreeMap<String, serde_json::Value>;

/// Which API endpoint a call goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    /// Free-text search (`/search`)
    Search,
    /// Lookup by id (`/lookup`)
    Lookup,
}

impl ApiMethod {
    /// Path segment appended to the base URL
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Lookup => "lookup",
        }
    }
}

impl std::str::FromStr for ApiMethod {
    type Err = crate::ItunesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "lookup" => Ok(Self::Lookup),
            other => Err(crate::ItunesError::invalid(format!(
                "unknown API method '{other}' (expected search or lookup)"
            ))),
        }
    }
}

impl std::fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result entity types used by the typed helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Song,
    Album,
    MusicArtist,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Song => "song",
            Self::Album => "album",
            Self::MusicArtist => "musicArtist",
        }
    }

    /// The `wrapperType` that results of this entity carry
    pub fn wrapper_type(&self) -> &'static str {
        match self {
            Self::Song => "track",
            Self::Album => "collection",
            Self::MusicArtist => "artist",
        }
    }
}

/// Search attribute restricting which field `term` matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    AlbumTerm,
    ArtistTerm,
    SongTerm,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlbumTerm => "albumTerm",
            Self::ArtistTerm => "artistTerm",
            Self::SongTerm => "songTerm",
        }
    }
}

/// Affiliate/partner tokens appended to every request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Affiliate {
    /// Sent as `partnerId`
    pub partner_id: Option<String>,
    /// TradeDoubler id, sent as `tduid`
    pub trade_doubler_id: Option<String>,
    /// Apple affiliate token, sent as `at`
    pub affiliate_token: Option<String>,
}

impl Affiliate {
    /// Query parameters for the tokens that are set and non-empty
    pub fn params(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("partnerId", self.partner_id.as_deref()),
            ("tduid", self.trade_doubler_id.as_deref()),
            ("at", self.affiliate_token.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
    }
}

/// A song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: u64,
    pub name: String,
    pub artist_id: Option<u64>,
    pub artist_name: Option<String>,
    pub album_id: Option<u64>,
    pub album_name: Option<String>,
    pub track_number: Option<u32>,
    pub track_count: Option<u32>,
    pub disc_number: Option<u32>,
    pub duration: Option<Duration>,
    pub genre: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub explicit: bool,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub preview_url: Option<String>,
    pub view_url: Option<String>,
    pub artwork_url: Option<String>,
}

/// An album (`collection` in API terms)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Album {
    pub id: u64,
    pub name: String,
    pub artist_id: Option<u64>,
    pub artist_name: Option<String>,
    pub track_count: Option<u32>,
    pub genre: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub explicit: bool,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub copyright: Option<String>,
    pub view_url: Option<String>,
    pub artwork_url: Option<String>,
}

/// An artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    pub genre: Option<String>,
    pub amg_id: Option<u64>,
    pub link_url: Option<String>,
}

impl Track {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }
}

impl Album {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }
}

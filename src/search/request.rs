//! Request construction: method + params + filters, and URL encoding.
//!
//! ## API Quirks
//!
//! The `term` parameter expects words joined by a literal `+`. Each word is
//! percent-encoded on its own and the `+` separators are kept, so a `+` that
//! is part of a word still goes out as `%2B`.
//!
//! Params live in a `BTreeMap`, so the same call always yields the same URL.
//! The response cache relies on that to key entries by URL.

use super::domain::{Affiliate, ApiMethod, Attribute, Entity, Filters, Params};
use crate::error::{ItunesError, Result};

/// Largest `limit` the API accepts
pub const MAX_LIMIT: u32 = 200;

/// A single API call before client-wide settings are merged in
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: ApiMethod,
    pub params: Params,
    pub filters: Filters,
}

/// Client-wide parameters merged into every request
#[derive(Debug, Clone, Default)]
pub struct SharedParams<'a> {
    pub country: Option<&'a str>,
    pub lang: Option<&'a str>,
    pub affiliate: Option<&'a Affiliate>,
}

impl ApiRequest {
    pub fn new(method: ApiMethod) -> Self {
        Self {
            method,
            params: Params::new(),
            filters: Filters::new(),
        }
    }

    /// Set a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set a result filter
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Set `limit`, clamped to what the API accepts. `None` leaves it unset.
    pub fn limit(mut self, limit: Option<u32>) -> Self {
        if let Some(limit) = limit {
            let clamped = limit.clamp(1, MAX_LIMIT);
            if clamped != limit {
                tracing::debug!("Clamping limit {} to {}", limit, clamped);
            }
            self.params.insert("limit".to_string(), clamped.to_string());
        }
        self
    }

    fn entity(self, entity: Entity) -> Self {
        self.param("entity", entity.as_str())
            .filter("wrapperType", entity.wrapper_type())
    }

    /// Songs on one or more albums
    pub fn tracks_for_albums(album_ids: &[u64], limit: Option<u32>) -> Result<Self> {
        if album_ids.is_empty() {
            return Err(ItunesError::invalid("at least one album id is required"));
        }
        let ids = album_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");

        Ok(Self::new(ApiMethod::Lookup)
            .param("id", ids)
            .entity(Entity::Song)
            .limit(limit))
    }

    /// Albums by an artist id
    pub fn albums_for_artist(artist_id: u64, limit: Option<u32>) -> Self {
        Self::new(ApiMethod::Lookup)
            .param("id", artist_id.to_string())
            .entity(Entity::Album)
            .limit(limit)
    }

    /// Albums named `album_name` by an artist named `artist_name`
    pub fn album_with_artist(artist_name: &str, album_name: &str, limit: Option<u32>) -> Result<Self> {
        let artist_name = non_blank(artist_name, "artist name")?;
        let album_name = non_blank(album_name, "album name")?;

        Ok(Self::new(ApiMethod::Search)
            .param("term", album_name)
            .param("attribute", Attribute::AlbumTerm.as_str())
            .entity(Entity::Album)
            .filter("artistName", artist_name)
            .limit(limit))
    }

    /// Artists matching a name
    pub fn id_for_artist(artist_name: &str) -> Result<Self> {
        let artist_name = non_blank(artist_name, "artist name")?;

        Ok(Self::new(ApiMethod::Search)
            .param("term", artist_name)
            .param("attribute", Attribute::ArtistTerm.as_str())
            .entity(Entity::MusicArtist))
    }

    /// Songs whose name matches `term`
    pub fn tracks_named(term: &str, limit: Option<u32>) -> Result<Self> {
        let term = non_blank(term, "search term")?;

        Ok(Self::new(ApiMethod::Search)
            .param("term", term)
            .param("attribute", Attribute::SongTerm.as_str())
            .entity(Entity::Song)
            .limit(limit))
    }

    /// Final params with client-wide values merged in. Call params win.
    pub fn merged_params(&self, shared: &SharedParams<'_>) -> Params {
        let mut params = self.params.clone();

        if self.method == ApiMethod::Search {
            params
                .entry("media".to_string())
                .or_insert_with(|| "music".to_string());
        }
        if let Some(country) = shared.country.map(str::trim).filter(|c| !c.is_empty()) {
            params
                .entry("country".to_string())
                .or_insert_with(|| country.to_string());
        }
        if let Some(lang) = shared.lang.map(str::trim).filter(|l| !l.is_empty()) {
            params
                .entry("lang".to_string())
                .or_insert_with(|| lang.to_string());
        }
        if let Some(affiliate) = shared.affiliate {
            for (key, value) in affiliate.params() {
                params
                    .entry(key.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
        // The store expects upper-case codes whoever set them
        if let Some(country) = params.get_mut("country") {
            *country = country.trim().to_ascii_uppercase();
        }
        params
    }

    /// Full request URL against `base_url`
    pub fn url(&self, base_url: &str, shared: &SharedParams<'_>) -> String {
        build_url(base_url, self.method, &self.merged_params(shared))
    }
}

/// Build `{base_url}/{method}?k=v&...` with API-style encoding.
pub fn build_url(base_url: &str, method: ApiMethod, params: &Params) -> String {
    let base = base_url.trim_end_matches('/');
    if params.is_empty() {
        return format!("{}/{}", base, method.as_str());
    }

    let query = params
        .iter()
        .map(|(key, value)| {
            let value = if key == "term" {
                encode_term(value)
            } else {
                urlencoding::encode(value).into_owned()
            };
            format!("{}={}", urlencoding::encode(key), value)
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}/{}?{}", base, method.as_str(), query)
}

/// Encode a search term: words percent-encoded, joined with `+`
pub fn encode_term(term: &str) -> String {
    term.split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ItunesError::invalid(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

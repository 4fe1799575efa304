//! iTunes Search HTTP client
//!
//! Handles communication with the iTunes Search web service.
//! See: https://performance-partners.apple.com/search-api
//!
//! ## API Quirks
//!
//! The API answers with `Content-Type: text/javascript`, so we read the body
//! as text and decode it ourselves instead of using `Response::json`. That
//! also gives us the raw body for the response cache.
//!
//! Apple throttles at roughly 20 calls per minute and answers 429 beyond
//! that. We surface it as [`ItunesError::RateLimited`] and leave retrying to
//! the caller.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::RwLock;
use serde_json::Value;

use super::adapter;
use super::domain::{Affiliate, Album, ApiMethod, Artist, Filters, Params, Track};
use super::dto;
use super::request::{ApiRequest, SharedParams};
use crate::cache::{CachedResponse, ResponseCache};
use crate::error::{ItunesError, Result};

/// Production endpoint
pub const DEFAULT_BASE_URL: &str = "https://itunes.apple.com";

/// Default user agent string sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared, runtime-updatable affiliate tokens.
pub type SharedAffiliate = Arc<RwLock<Affiliate>>;

/// Client-wide request settings
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// API root, without the method segment
    pub base_url: String,
    /// Two-letter store country code (e.g. `US`, `GB`)
    pub country: Option<String>,
    /// Result language (e.g. `en_us`, `ja_jp`)
    pub lang: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Max age recorded with cached responses
    pub cache_max_age: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            country: None,
            lang: None,
            timeout: Duration::from_secs(30),
            cache_max_age: Duration::from_secs(60 * 60),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// iTunes Search API client
pub struct ItunesClient {
    http_client: reqwest::Client,
    settings: ClientSettings,
    affiliate: SharedAffiliate,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl ItunesClient {
    /// Create a client with the given settings and no cache
    ///
    /// The client is configured to:
    /// - Accept gzip-compressed responses
    /// - Send the configured User-Agent header
    pub fn new(settings: ClientSettings) -> Self {
        Self::build(settings, true)
    }

    /// Like [`new`](Self::new), but idle connections are never kept.
    ///
    /// Pooled connections belong to the tokio runtime that opened them, so a
    /// client that outlives its runtime must not reuse them.
    fn unpooled(settings: ClientSettings) -> Self {
        Self::build(settings, false)
    }

    fn build(settings: ClientSettings, pooled: bool) -> Self {
        let mut builder = reqwest::Client::builder()
            .gzip(true)
            .user_agent(settings.user_agent.as_str());
        if !pooled {
            builder = builder.pool_max_idle_per_host(0);
        }
        // Tests talk to a local server; never route them through an env proxy
        #[cfg(test)]
        let builder = builder.no_proxy();

        let http_client = builder.build().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        });

        Self {
            http_client,
            settings,
            affiliate: SharedAffiliate::default(),
            cache: None,
        }
    }

    /// Use a cache delegate for responses
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Share affiliate tokens with other clients
    pub fn with_affiliate(mut self, affiliate: SharedAffiliate) -> Self {
        self.affiliate = affiliate;
        self
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Current affiliate tokens
    pub fn affiliate(&self) -> Affiliate {
        self.affiliate.read().clone()
    }

    pub fn set_affiliate(&self, affiliate: Affiliate) {
        *self.affiliate.write() = affiliate;
    }

    pub fn set_partner_id(&self, partner_id: Option<String>) {
        self.affiliate.write().partner_id = partner_id;
    }

    pub fn set_trade_doubler_id(&self, trade_doubler_id: Option<String>) {
        self.affiliate.write().trade_doubler_id = trade_doubler_id;
    }

    pub fn set_affiliate_token(&self, affiliate_token: Option<String>) {
        self.affiliate.write().affiliate_token = affiliate_token;
    }

    /// The URL a request would be sent to, with client-wide params merged in
    pub fn request_url(&self, request: &ApiRequest) -> String {
        let affiliate = self.affiliate();
        let shared = SharedParams {
            country: self.settings.country.as_deref(),
            lang: self.settings.lang.as_deref(),
            affiliate: Some(&affiliate),
        };
        request.url(&self.settings.base_url, &shared)
    }

    /// Call `method` with `params` and keep the raw results matching `filters`
    pub async fn perform_api_call(
        &self,
        method: ApiMethod,
        params: Params,
        filters: Filters,
    ) -> Result<Vec<Value>> {
        self.execute(&ApiRequest {
            method,
            params,
            filters,
        })
        .await
    }

    /// Run a prepared request and return the filtered raw results
    pub async fn execute(&self, request: &ApiRequest) -> Result<Vec<Value>> {
        let url = self.request_url(request);

        let cached = self.cache.as_ref().and_then(|c| c.cached_response(&url));
        let from_network = cached.is_none();
        let body = match cached {
            Some(hit) => {
                tracing::debug!("Cache hit for {}", url);
                hit.body
            }
            None => {
                tracing::debug!("GET {}", url);
                self.fetch_body(&url).await?
            }
        };

        let response = parse_envelope(&body)?;
        if response.result_count as usize != response.results.len() {
            tracing::debug!(
                "resultCount {} does not match {} results",
                response.result_count,
                response.results.len()
            );
        }

        if from_network {
            self.store(&url, body);
        }

        Ok(adapter::apply_filters(response.results, &request.filters))
    }

    /// Songs on the given albums
    pub async fn get_tracks_for_albums(
        &self,
        album_ids: &[u64],
        limit: Option<u32>,
    ) -> Result<Vec<Track>> {
        let request = ApiRequest::tracks_for_albums(album_ids, limit)?;
        adapter::to_tracks(self.execute(&request).await?)
    }

    /// Albums released by an artist
    pub async fn get_albums_for_artist(
        &self,
        artist_id: u64,
        limit: Option<u32>,
    ) -> Result<Vec<Album>> {
        let request = ApiRequest::albums_for_artist(artist_id, limit);
        adapter::to_albums(self.execute(&request).await?)
    }

    /// Albums with the given name by the given artist
    pub async fn get_album_with_artist(
        &self,
        artist_name: &str,
        album_name: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Album>> {
        let request = ApiRequest::album_with_artist(artist_name, album_name, limit)?;
        adapter::to_albums(self.execute(&request).await?)
    }

    /// Artists matching a name, for finding an artist id
    pub async fn get_id_for_artist(&self, artist_name: &str) -> Result<Vec<Artist>> {
        let request = ApiRequest::id_for_artist(artist_name)?;
        adapter::to_artists(self.execute(&request).await?)
    }

    /// Songs whose name matches `term`
    pub async fn search_tracks(&self, term: &str, limit: Option<u32>) -> Result<Vec<Track>> {
        let request = ApiRequest::tracks_named(term, limit)?;
        adapter::to_tracks(self.execute(&request).await?)
    }

    /// Send the HTTP request and return the body of a successful response
    async fn fetch_body(&self, url: &str) -> Result<String> {
        let response = self
            .http_client
            .get(url)
            .timeout(self.settings.timeout)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ItunesError::RateLimited);
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            // Try to surface the API's own message
            let message = serde_json::from_str::<dto::ApiError>(&body)
                .map(|e| e.error_message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown").to_string());
            return Err(ItunesError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    fn transport_error(&self, err: reqwest::Error) -> ItunesError {
        if err.is_timeout() {
            ItunesError::Timeout(self.settings.timeout)
        } else {
            ItunesError::Network(err.to_string())
        }
    }

    fn store(&self, url: &str, body: String) {
        let Some(cache) = &self.cache else {
            return;
        };
        let entry = CachedResponse::new(body, self.settings.cache_max_age);
        if let Err(e) = cache.store_response(url, &entry) {
            // Cache failures never fail the call
            tracing::warn!("Failed to cache response for {}: {}", url, e);
        }
    }
}

impl Default for ItunesClient {
    fn default() -> Self {
        Self::new(ClientSettings::default())
    }
}

/// Process-wide client with default settings and no cache
///
/// The shared client keeps no idle connections, so it can be used from
/// several tokio runtimes over the life of the process (for example one
/// `Runtime` per command).
pub fn shared() -> &'static ItunesClient {
    static SHARED: OnceLock<ItunesClient> = OnceLock::new();
    SHARED.get_or_init(|| ItunesClient::unpooled(ClientSettings::default()))
}

fn parse_envelope(body: &str) -> Result<dto::SearchResponse> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(ItunesError::parse)
}

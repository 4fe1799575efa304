//! iTunes Search API integration
//!
//! This module follows the same split for every call:
//! - **Request** (`request.rs`) - method, params and filters, URL encoding
//! - **Client** (`client.rs`) - HTTP round trip, cache delegate
//! - **DTOs** (`dto.rs`) - exact API response shapes
//! - **Adapter** (`adapter.rs`) - filtering and DTO to domain conversion
//! - **Domain** (`domain.rs`) - the types callers see
//!
//! API docs: https://performance-partners.apple.com/search-api

mod adapter;
mod client;
pub mod domain;
pub mod dto;
pub mod request;
pub mod traits;

pub use adapter::{apply_filters, matches_filters};
pub use client::{
    ClientSettings, DEFAULT_BASE_URL, ItunesClient, SharedAffiliate, USER_AGENT, shared,
};
pub use domain::{Affiliate, Album, ApiMethod, Artist, Attribute, Entity, Filters, Params, Track};
pub use request::{ApiRequest, MAX_LIMIT};
pub use traits::ItunesApi;

//! In-process response cache.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use super::{CachedResponse, ResponseCache};

/// Response cache backed by a map. No eviction; stale entries are dropped on read.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ResponseCache for MemoryCache {
    fn cached_response(&self, url: &str) -> Option<CachedResponse> {
        let entry = self.entries.read().get(url).cloned()?;
        if entry.is_fresh(Utc::now()) {
            return Some(entry);
        }
        self.entries.write().remove(url);
        None
    }

    fn store_response(&self, url: &str, response: &CachedResponse) -> crate::Result<()> {
        self.entries
            .write()
            .insert(url.to_string(), response.clone());
        Ok(())
    }

    fn clear(&self) -> crate::Result<()> {
        self.entries.write().clear();
        Ok(())
    }
}

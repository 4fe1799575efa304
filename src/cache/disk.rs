//! Response disk cache.
//!
//! One JSON envelope per request URL. The file name is the SHA-256 of the
//! URL, so arbitrary query strings map to safe names.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use super::{CachedResponse, ResponseCache};
use crate::error::ItunesError;

/// Response disk cache.
#[derive(Debug, Clone)]
pub struct DiskCache {
    cache_dir: PathBuf,
}

impl DiskCache {
    /// Create a cache in the specified directory, creating it if needed.
    pub fn new(cache_dir: impl Into<PathBuf>) -> crate::Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|e| {
            ItunesError::Cache(format!("creating {}: {}", cache_dir.display(), e))
        })?;
        Ok(Self { cache_dir })
    }

    /// Default location: the user cache directory.
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("itunes-search")
            .join("responses")
    }

    /// Create a cache in the default location.
    pub fn default_location() -> crate::Result<Self> {
        Self::new(Self::default_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Check if a URL has an entry on disk, fresh or not.
    pub fn contains(&self, url: &str) -> bool {
        self.cache_path(url).exists()
    }

    /// Number of entries on disk.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the total size of the cache in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.entries()
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum()
    }

    fn entries(&self) -> impl Iterator<Item = fs::DirEntry> {
        fs::read_dir(&self.cache_dir)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        let name: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        self.cache_dir.join(format!("{}.json", name))
    }

    fn read_entry(&self, path: &Path) -> Option<CachedResponse> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Discarding corrupt cache entry {:?}: {}", path, e);
                let _ = fs::remove_file(path);
                None
            }
        }
    }
}

impl ResponseCache for DiskCache {
    fn cached_response(&self, url: &str) -> Option<CachedResponse> {
        let path = self.cache_path(url);
        if !path.exists() {
            return None;
        }

        let entry = self.read_entry(&path)?;
        if !entry.is_fresh(Utc::now()) {
            tracing::debug!("Cache entry for {} is stale", url);
            let _ = fs::remove_file(&path);
            return None;
        }
        Some(entry)
    }

    fn store_response(&self, url: &str, response: &CachedResponse) -> crate::Result<()> {
        let path = self.cache_path(url);
        let contents =
            serde_json::to_string(response).map_err(|e| ItunesError::Cache(e.to_string()))?;

        let write_err = |e: std::io::Error| ItunesError::Cache(format!("writing {}: {}", path.display(), e));

        // Each writer gets its own temp file; readers never see a partial entry
        let mut temp = NamedTempFile::new_in(&self.cache_dir).map_err(write_err)?;
        temp.write_all(contents.as_bytes()).map_err(write_err)?;
        temp.persist(&path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    fn clear(&self) -> crate::Result<()> {
        for entry in self.entries() {
            fs::remove_file(entry.path())
                .map_err(|e| ItunesError::Cache(format!("removing {:?}: {}", entry.path(), e)))?;
        }
        Ok(())
    }
}

//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\itunes-search\config.toml
//! - macOS: ~/Library/Application Support/itunes-search/config.toml
//! - Linux: ~/.config/itunes-search/config.toml
//!
//! Every section is optional; missing fields fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::search::{Affiliate, ClientSettings, DEFAULT_BASE_URL, USER_AGENT};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Request settings
    pub search: SearchConfig,

    /// Affiliate/partner tokens
    pub affiliate: AffiliateConfig,

    /// Response cache settings
    pub cache: CacheConfig,
}

/// Request settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Store country code (empty = API default, US)
    pub country: Option<String>,

    /// Result language, e.g. "en_us"
    pub lang: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// API root; only changed for testing
    pub base_url: String,

    /// User-Agent header (empty = itunes-search/<version>)
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            country: None,
            lang: None,
            timeout_secs: 30,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
        }
    }
}

/// Affiliate/partner tokens (kept separate like credentials)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliateConfig {
    pub partner_id: Option<String>,
    pub trade_doubler_id: Option<String>,
    pub affiliate_token: Option<String>,
}

/// Response cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether responses are cached on disk
    pub enabled: bool,

    /// How long cached responses stay fresh, in seconds
    pub max_age_secs: u64,

    /// Cache directory (empty = user cache dir)
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age_secs: 60 * 60,
            dir: None,
        }
    }
}

impl Config {
    /// Client settings derived from this config
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.search.base_url.clone(),
            country: self.search.country.clone(),
            lang: self.search.lang.clone(),
            timeout: Duration::from_secs(self.search.timeout_secs.max(1)),
            cache_max_age: Duration::from_secs(self.cache.max_age_secs),
            user_agent: self
                .search
                .user_agent
                .as_deref()
                .map(str::trim)
                .filter(|ua| !ua.is_empty())
                .unwrap_or(USER_AGENT)
                .to_string(),
        }
    }

    /// Affiliate tokens derived from this config
    pub fn affiliate(&self) -> Affiliate {
        Affiliate {
            partner_id: self.affiliate.partner_id.clone(),
            trade_doubler_id: self.affiliate.trade_doubler_id.clone(),
            affiliate_token: self.affiliate.affiliate_token.clone(),
        }
    }

    /// Cache directory, falling back to the user cache dir
    pub fn cache_dir(&self) -> PathBuf {
        self.cache
            .dir
            .clone()
            .unwrap_or_else(crate::cache::DiskCache::default_dir)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("itunes-search"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if the file doesn't exist or can't be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

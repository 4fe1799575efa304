//! CLI command definitions and dispatch.
//!
//! Each group of subcommands is implemented in its own submodule:
//! - `search`: API calls (tracks, albums, artist ids, raw calls)
//! - `local`: cache and config housekeeping

mod local;
mod search;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::search::{ApiMethod, ItunesClient};
use crate::{DiskCache, ResponseCache};

pub use local::{cmd_cache_clear, cmd_cache_info, cmd_config_path, cmd_config_show};
pub use search::{
    cmd_album, cmd_albums, cmd_artist_id, cmd_raw, cmd_search_tracks, cmd_tracks,
};

/// iTunes Search CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Store country code (e.g. US, GB, JP)
    #[arg(long, global = true, env = "ITUNES_COUNTRY")]
    pub country: Option<String>,

    /// Result language (e.g. en_us, ja_jp)
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Bypass the response cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "ITUNES_SEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List the songs on one or more albums
    Tracks {
        /// Album (collection) ids
        #[arg(required = true, num_args = 1..)]
        album_ids: Vec<u64>,
        /// Maximum number of results (1-200)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List the albums of an artist
    Albums {
        /// Artist id
        artist_id: u64,
        /// Maximum number of results (1-200)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Find an album by artist and album name
    Album {
        /// Artist name
        #[arg(short, long)]
        artist: String,
        /// Album name
        #[arg(short, long)]
        name: String,
        /// Maximum number of results (1-200)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Find artist ids by name
    ArtistId {
        /// Artist name
        name: String,
    },
    /// Find songs by name
    SearchTracks {
        /// Song name
        term: String,
        /// Maximum number of results (1-200)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Call the API directly and print the raw results
    Raw {
        /// search or lookup
        method: ApiMethod,
        /// Query parameter, repeatable (key=value)
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        /// Result filter, repeatable (key=value)
        #[arg(short = 'f', long = "filter", value_parser = parse_key_val)]
        filters: Vec<(String, String)>,
    },
    /// Inspect or clear the response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Show cache location and size
    Info,
    /// Delete every cached response
    Clear,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl GlobalArgs {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref country) = self.country {
            config.search.country = Some(country.clone());
        }
        if let Some(ref lang) = self.lang {
            config.search.lang = Some(lang.clone());
        }
        if let Some(timeout) = self.timeout {
            config.search.timeout_secs = timeout;
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.global.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    cli.global.apply(&mut config);

    let format = cli.global.format();
    let mut out = std::io::stdout().lock();

    match &cli.command {
        Commands::Cache { action } => {
            let cache = DiskCache::new(config.cache_dir())?;
            match action {
                CacheAction::Info => cmd_cache_info(&cache, &mut out),
                CacheAction::Clear => cmd_cache_clear(&cache, &mut out),
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(&config, &mut out),
            ConfigAction::Path => cmd_config_path(cli.global.config.as_deref(), &mut out),
        },
        command => {
            let client = build_client(&config)?;
            let rt = Runtime::new()?;
            rt.block_on(run_api_command(&client, command, format, &mut out))
        }
    }
}

async fn run_api_command(
    client: &ItunesClient,
    command: &Commands,
    format: OutputFormat,
    out: &mut impl std::io::Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Tracks { album_ids, limit } => {
            cmd_tracks(client, out, album_ids, *limit, format).await
        }
        Commands::Albums { artist_id, limit } => {
            cmd_albums(client, out, *artist_id, *limit, format).await
        }
        Commands::Album {
            artist,
            name,
            limit,
        } => cmd_album(client, out, artist, name, *limit, format).await,
        Commands::ArtistId { name } => cmd_artist_id(client, out, name, format).await,
        Commands::SearchTracks { term, limit } => {
            cmd_search_tracks(client, out, term, *limit, format).await
        }
        Commands::Raw {
            method,
            params,
            filters,
        } => cmd_raw(client, out, *method, params, filters).await,
        Commands::Cache { .. } | Commands::Config { .. } => {
            anyhow::bail!("cache and config commands do not call the API")
        }
    }
}

/// Build a client from config, with the disk cache when enabled
pub fn build_client(config: &Config) -> anyhow::Result<ItunesClient> {
    let client = ItunesClient::new(config.client_settings());
    client.set_affiliate(config.affiliate());

    if !config.cache.enabled || config.cache.max_age_secs == 0 {
        return Ok(client);
    }

    let cache: Arc<dyn ResponseCache> = Arc::new(DiskCache::new(config.cache_dir())?);
    tracing::debug!(
        "Caching responses in {:?} for {:?}",
        config.cache_dir(),
        Duration::from_secs(config.cache.max_age_secs)
    );
    Ok(client.with_cache(cache))
}

/// Parse a `key=value` argument
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

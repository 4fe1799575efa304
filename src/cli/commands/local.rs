//! Cache and config housekeeping commands.

use std::io::Write;
use std::path::Path;

use crate::config::{self, Config};
use crate::{DiskCache, ResponseCache};

/// Show cache location and size
pub fn cmd_cache_info(cache: &DiskCache, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "Cache directory: {}", cache.dir().display())?;
    writeln!(out, "Entries:         {}", cache.len())?;
    writeln!(out, "Size:            {}", format_bytes(cache.size_bytes()))?;
    Ok(())
}

/// Delete every cached response
pub fn cmd_cache_clear(cache: &DiskCache, out: &mut impl Write) -> anyhow::Result<()> {
    let entries = cache.len();
    cache.clear()?;
    writeln!(out, "Removed {} cached responses", entries)?;
    Ok(())
}

/// Print the effective configuration as TOML
pub fn cmd_config_show(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    write!(out, "{}", toml::to_string_pretty(config)?)?;
    Ok(())
}

/// Print the config file path
pub fn cmd_config_path(explicit: Option<&Path>, out: &mut impl Write) -> anyhow::Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(config::config_path)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let status = if path.exists() { "" } else { " (not created yet)" };
    writeln!(out, "{}{}", path.display(), status)?;
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    match bytes {
        b if b >= MIB => format!("{:.1} MiB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.1} KiB", b as f64 / KIB as f64),
        b => format!("{} B", b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CachedResponse;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_cache_info_and_clear() {
        let temp = TempDir::new().unwrap();
        let cache = DiskCache::new(temp.path()).unwrap();
        let response = CachedResponse::new("{}", Duration::from_secs(60));
        cache.store_response("a", &response).unwrap();
        cache.store_response("b", &response).unwrap();

        let mut buf = Vec::new();
        cmd_cache_info(&cache, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("Entries:         2"));

        let mut buf = Vec::new();
        cmd_cache_clear(&cache, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Removed 2 cached responses\n");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_config_show_is_valid_toml() {
        let mut buf = Vec::new();
        cmd_config_show(&Config::default(), &mut buf).unwrap();

        let parsed: Config = toml::from_str(&String::from_utf8(buf).unwrap()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_config_path_explicit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");

        let mut buf = Vec::new();
        cmd_config_path(Some(&path), &mut buf).unwrap();
        let printed = String::from_utf8(buf).unwrap();
        assert!(printed.contains("custom.toml"));
        assert!(printed.contains("not created yet"));
    }
}

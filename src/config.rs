use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::DEFAULT_WATCH_FALLBACK;

pub const DEFAULT_SOURCE: &str = "movies.json";
pub const DEFAULT_LOG_FILTER: &str = "info";
const LOCAL_CONFIG: &str = ".catalog-explorer.toml";

/// On-disk TOML configuration. Every key is optional so partial files work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Catalog path or http(s) URL.
    pub source: Option<String>,
    /// Target of "Watch Online" when an item has no `watchLink`.
    pub watch_fallback_url: Option<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: String,
    pub watch_fallback_url: String,
    pub log_filter: String,
}

pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "catalog-explorer", "catalog-explorer")
}

/// Platform config path: `<config_dir>/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

/// Load config by cascading the working-directory `.catalog-explorer.toml`
/// over the platform config. An explicit path replaces the cascade.
pub fn load_config(explicit: Option<&Path>) -> ConfigFile {
    if let Some(path) = explicit {
        return load_from_path(path).unwrap_or_default();
    }

    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(LOCAL_CONFIG));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        source: overlay.source.or(base.source),
        watch_fallback_url: overlay.watch_fallback_url.or(base.watch_fallback_url),
        log_filter: overlay.log_filter.or(base.log_filter),
    }
}

impl ConfigFile {
    /// Fill in defaults; a command-line source wins over the file.
    pub fn resolve(self, source_override: Option<String>) -> Settings {
        Settings {
            source: source_override
                .or(self.source)
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            watch_fallback_url: self
                .watch_fallback_url
                .unwrap_or_else(|| DEFAULT_WATCH_FALLBACK.to_string()),
            log_filter: self
                .log_filter
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

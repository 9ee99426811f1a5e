use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};
use crate::github::{IGNORED_DIRS, IGNORED_SUFFIXES, MAX_FILE_SIZE, TreeFilter};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Hard ceiling on files analyzed per repository.
pub const DEFAULT_MAX_FILES: usize = 200;

/// Path alias prefix resolved against the repository root.
pub const DEFAULT_ALIAS_PREFIX: &str = "@/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub analysis: Analysis,
    pub fetch: Fetch,
    pub cache: Cache,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub alias_prefix: String,
    pub max_files: usize,
}

#[derive(Debug, Clone)]
pub struct Fetch {
    pub max_file_size: u64,
    pub ignored_dirs: Vec<String>,
    pub ignored_suffixes: Vec<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Cache {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    analysis: Option<RawAnalysis>,
    fetch: Option<RawFetch>,
    cache: Option<RawCache>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    alias_prefix: Option<String>,
    max_files: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawFetch {
    max_file_size: Option<u64>,
    ignored_dirs: Option<Vec<String>>,
    ignored_suffixes: Option<Vec<String>>,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCache {
    ttl_secs: Option<u64>,
    max_entries: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis: Analysis::default(),
            fetch: Fetch::default(),
            cache: Cache::default(),
        }
    }
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            alias_prefix: DEFAULT_ALIAS_PREFIX.to_string(),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl Default for Fetch {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            ignored_dirs: IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
            ignored_suffixes: IGNORED_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            token: None,
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Config {
    /// Load `.codecanvas.toml` from the working directory. A missing file
    /// yields defaults; the token falls back to `GITHUB_TOKEN`.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(".codecanvas.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        if config.fetch.token.is_none() {
            config.fetch.token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        }

        Ok(config)
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Config::default();

        let analysis = match raw.analysis {
            Some(a) => Analysis {
                alias_prefix: a.alias_prefix.unwrap_or(defaults.analysis.alias_prefix),
                max_files: a.max_files.unwrap_or(defaults.analysis.max_files),
            },
            None => defaults.analysis,
        };

        let fetch = match raw.fetch {
            Some(f) => Fetch {
                max_file_size: f.max_file_size.unwrap_or(defaults.fetch.max_file_size),
                ignored_dirs: f.ignored_dirs.unwrap_or(defaults.fetch.ignored_dirs),
                ignored_suffixes: f.ignored_suffixes.unwrap_or(defaults.fetch.ignored_suffixes),
                token: f.token,
            },
            None => defaults.fetch,
        };

        let cache = match raw.cache {
            Some(c) => Cache {
                ttl_secs: c.ttl_secs.unwrap_or(defaults.cache.ttl_secs),
                max_entries: c.max_entries.unwrap_or(defaults.cache.max_entries),
            },
            None => defaults.cache,
        };

        Ok(Self {
            analysis,
            fetch,
            cache,
        })
    }

    pub fn tree_filter(&self) -> TreeFilter {
        TreeFilter {
            ignored_dirs: self.fetch.ignored_dirs.clone(),
            ignored_suffixes: self.fetch.ignored_suffixes.clone(),
            max_file_size: self.fetch.max_file_size,
        }
    }
}

/// Starter config written by `codecanvas init`.
pub fn generate_config_template() -> String {
    format!(
        r#"# CodeCanvas configuration

[analysis]
# Import prefix resolved against the repository root.
alias_prefix = "{DEFAULT_ALIAS_PREFIX}"
# Largest number of source files analyzed per repository.
max_files = {DEFAULT_MAX_FILES}

[fetch]
# Files above this size (bytes) are skipped.
max_file_size = {MAX_FILE_SIZE}
# GitHub token; defaults to the GITHUB_TOKEN environment variable.
# token = "ghp_..."

[cache]
# Seconds before a cached snapshot goes stale.
ttl_secs = {DEFAULT_TTL_SECS}
# Snapshots kept before the oldest is evicted.
max_entries = {DEFAULT_MAX_ENTRIES}
"#
    )
}

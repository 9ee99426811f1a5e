//! Repository access: the fetcher trait, tree filtering, and repo spec
//! parsing. The REST client lives in [`client`].

mod client;

pub use client::GitHubClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Directory names excluded from analysis wherever they appear in a path.
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    ".git",
    "vendor",
    "coverage",
    ".next",
    "out",
    ".cache",
];

/// Filename suffixes excluded from analysis.
pub const IGNORED_SUFFIXES: &[&str] = &[".min.js", ".min.css", ".map", ".lock", ".log"];

/// Files above this size are skipped entirely.
pub const MAX_FILE_SIZE: u64 = 500 * 1024;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("repository {owner}/{repo} not found")]
    NotFound { owner: String, repo: String },
    #[error("GitHub API rate limit exceeded; try again later or set a token")]
    RateLimited,
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid API base URL \"{0}\"")]
    InvalidApiBase(String),
    #[error("invalid repository spec \"{0}\" (expected owner/repo or a github.com URL)")]
    InvalidSpec(String),
}

/// A file entry in a repository tree, already filtered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoFile {
    pub path: String,
    pub size: u64,
}

/// The filtered file listing of a repository at a point in time.
#[derive(Debug, Clone)]
pub struct RepoTree {
    pub files: Vec<RepoFile>,
    pub sha: String,
    /// One entry per oversized file skipped during filtering.
    pub warnings: Vec<String>,
    /// True when the listing was cut off server-side.
    pub truncated: bool,
}

#[async_trait]
pub trait RepoFetcher: Send + Sync {
    /// List the repository's files at HEAD, filtered to analyzable entries.
    async fn fetch_tree(&self, owner: &str, repo: &str) -> Result<RepoTree, FetchError>;

    /// Fetch one file's contents as text.
    async fn fetch_file(&self, owner: &str, repo: &str, path: &str)
    -> Result<String, FetchError>;
}

/// Which tree entries survive into analysis.
#[derive(Debug, Clone)]
pub struct TreeFilter {
    pub ignored_dirs: Vec<String>,
    pub ignored_suffixes: Vec<String>,
    pub max_file_size: u64,
}

impl Default for TreeFilter {
    fn default() -> Self {
        Self {
            ignored_dirs: IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
            ignored_suffixes: IGNORED_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl TreeFilter {
    /// Whether a path is excluded outright. Ignored directories match any
    /// path segment, not just the first.
    pub fn ignores_path(&self, path: &str) -> bool {
        if path
            .split('/')
            .any(|segment| self.ignored_dirs.iter().any(|d| d == segment))
        {
            return true;
        }
        self.ignored_suffixes.iter().any(|s| path.ends_with(s))
    }

    /// Oversized files are skipped too, but with a warning.
    pub fn is_oversized(&self, size: u64) -> bool {
        size > self.max_file_size
    }

    pub fn keeps(&self, path: &str, size: u64) -> bool {
        !self.ignores_path(path) && !self.is_oversized(size)
    }

    /// Split tree entries into the kept files and the oversized-skip
    /// warnings. Ignored paths are dropped silently; oversized files get
    /// exactly one warning each.
    pub fn apply(&self, entries: impl IntoIterator<Item = RepoFile>) -> (Vec<RepoFile>, Vec<String>) {
        let mut files = Vec::new();
        let mut warnings = Vec::new();
        for entry in entries {
            if self.ignores_path(&entry.path) {
                continue;
            }
            if self.is_oversized(entry.size) {
                warnings.push(format!(
                    "Skipping {} ({} KB exceeds the {} KB limit)",
                    entry.path,
                    entry.size / 1024,
                    self.max_file_size / 1024
                ));
                continue;
            }
            files.push(entry);
        }
        (files, warnings)
    }
}

/// An owner/repo pair parsed from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Accepts `owner/repo` or a `github.com/owner/repo` URL, with an
/// optional trailing `.git` or deeper path.
pub fn parse_repo_spec(input: &str) -> Result<RepoSpec, FetchError> {
    let trimmed = input.trim();

    let rest = trimmed
        .strip_prefix("https://github.com/")
        .or_else(|| trimmed.strip_prefix("http://github.com/"))
        .or_else(|| trimmed.strip_prefix("github.com/"))
        .unwrap_or(trimmed);

    let mut parts = rest.split('/').filter(|p| !p.is_empty());
    let owner = parts.next();
    let repo = parts.next();

    match (owner, repo) {
        (Some(owner), Some(repo)) if !owner.contains(':') => Ok(RepoSpec {
            owner: owner.to_string(),
            repo: repo.trim_end_matches(".git").to_string(),
        }),
        _ => Err(FetchError::InvalidSpec(input.to_string())),
    }
}

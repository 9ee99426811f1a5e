//! The analysis pipeline: cache lookup, tree fetch, sequential file
//! fetch and parse, graph build, layout, cache store.

use crate::cache::{CacheError, SnapshotCache};
use crate::config::Config;
use crate::github::{FetchError, RepoFetcher, RepoSpec};
use crate::graph::{CanvasGraph, DependencyGraph, GraphMetadata};
use crate::layout::{
    Direction, NODE_HEIGHT, NODE_WIDTH, assign_positions, dependency_options, file_tree_graph,
};
use crate::model::ParsedFile;
use crate::parser;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("an analysis is already running")]
    AnalysisInFlight,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Pipeline stage notifications, for progress reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    FetchingTree,
    ParsingFile {
        current: usize,
        total: usize,
        path: String,
    },
    BuildingGraph,
    ApplyingLayout,
}

/// What an analysis run produced, alongside the graph itself.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub graph: CanvasGraph,
    pub from_cache: bool,
    /// Files in the repository tree after filtering.
    pub total_files: usize,
    /// Files with a parseable extension.
    pub parseable_files: usize,
    /// Files actually fetched and parsed (capped).
    pub analyzed_files: usize,
}

/// Runs analyses against a fetcher. At most one analysis runs at a time
/// per instance; a second call while one is in flight fails fast instead
/// of queueing.
pub struct Analyzer<'a> {
    fetcher: &'a dyn RepoFetcher,
    config: &'a Config,
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<'a> Analyzer<'a> {
    pub fn new(fetcher: &'a dyn RepoFetcher, config: &'a Config) -> Self {
        Self {
            fetcher,
            config,
            busy: AtomicBool::new(false),
        }
    }

    fn acquire(&self) -> Result<BusyGuard<'_>, CanvasError> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| CanvasError::AnalysisInFlight)?;
        Ok(BusyGuard(&self.busy))
    }

    /// Produce the dependency graph for a repository. A fresh cached
    /// snapshot short-circuits the network entirely; otherwise the result
    /// is stored back under the repository's `owner/repo` key.
    pub async fn analyze(
        &self,
        spec: &RepoSpec,
        direction: Direction,
        mut cache: Option<&mut SnapshotCache<'_, CanvasGraph>>,
        mut progress: impl FnMut(Progress),
    ) -> Result<AnalysisReport, CanvasError> {
        let _guard = self.acquire()?;
        let key = spec.to_string();

        if let Some(cache) = cache.as_mut() {
            if let Some(graph) = cache.get(&key)? {
                return Ok(AnalysisReport {
                    analyzed_files: graph.metadata.node_count,
                    parseable_files: graph.metadata.node_count,
                    total_files: graph.metadata.node_count,
                    from_cache: true,
                    graph,
                });
            }
        }

        progress(Progress::FetchingTree);
        let tree = self.fetcher.fetch_tree(&spec.owner, &spec.repo).await?;
        let total_files = tree.files.len();
        let mut warnings = tree.warnings.clone();

        let parseable: Vec<&str> = tree
            .files
            .iter()
            .map(|f| f.path.as_str())
            .filter(|p| parser::can_parse(p))
            .collect();
        let parseable_files = parseable.len();

        let max_files = self.config.analysis.max_files;
        let analyzed = if parseable.len() > max_files {
            warnings.push(format!(
                "Repository has {} parseable files. Analyzing first {} files.",
                parseable.len(),
                max_files
            ));
            &parseable[..max_files]
        } else {
            &parseable[..]
        };

        // Files are fetched one at a time; a failed fetch becomes a failed
        // parse rather than aborting the run.
        let mut parsed = Vec::with_capacity(analyzed.len());
        for (i, path) in analyzed.iter().enumerate() {
            progress(Progress::ParsingFile {
                current: i + 1,
                total: analyzed.len(),
                path: path.to_string(),
            });
            match self.fetcher.fetch_file(&spec.owner, &spec.repo, path).await {
                Ok(content) => parsed.push(parser::parse(&content, path)),
                Err(e) => {
                    parsed.push(ParsedFile::failed(*path, format!("Failed to fetch file: {e}")))
                }
            }
        }

        progress(Progress::BuildingGraph);
        let dependency_graph =
            DependencyGraph::build(&parsed, &self.config.analysis.alias_prefix);

        progress(Progress::ApplyingLayout);
        let sizes = vec![(NODE_WIDTH, NODE_HEIGHT); dependency_graph.node_count()];
        let positions = assign_positions(
            dependency_graph.graph(),
            &sizes,
            &dependency_options(direction),
        );

        let metadata = GraphMetadata {
            owner: spec.owner.clone(),
            repo: spec.repo.clone(),
            sha: tree.sha,
            node_count: dependency_graph.node_count(),
            edge_count: dependency_graph.edge_count(),
        };
        let mut graph = dependency_graph.into_canvas(positions, metadata);
        // Fetch and cap warnings first, resolution warnings after.
        warnings.append(&mut graph.warnings);
        graph.warnings = warnings;

        if let Some(cache) = cache.as_mut() {
            cache.set(&key, graph.clone())?;
        }

        Ok(AnalysisReport {
            analyzed_files: parsed.len(),
            parseable_files,
            total_files,
            from_cache: false,
            graph,
        })
    }

    /// Produce the file-tree view of a repository. Never cached; the tree
    /// listing is a single request.
    pub async fn file_tree(&self, spec: &RepoSpec) -> Result<CanvasGraph, CanvasError> {
        let _guard = self.acquire()?;

        let tree = self.fetcher.fetch_tree(&spec.owner, &spec.repo).await?;
        let metadata = GraphMetadata {
            owner: spec.owner.clone(),
            repo: spec.repo.clone(),
            sha: tree.sha.clone(),
            node_count: 0,
            edge_count: 0,
        };
        let mut graph = file_tree_graph(&tree.files, metadata);
        graph.warnings = tree.warnings;
        Ok(graph)
    }
}

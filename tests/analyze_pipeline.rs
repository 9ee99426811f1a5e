//! End-to-end tests of the analysis pipeline against a scripted fetcher.

use async_trait::async_trait;
use codecanvas::cache::{SnapshotCache, SystemClock};
use codecanvas::config::Config;
use codecanvas::fs::RealFs;
use codecanvas::github::{FetchError, RepoFetcher, RepoFile, RepoSpec, RepoTree};
use codecanvas::graph::CanvasGraph;
use codecanvas::layout::Direction;
use codecanvas::model::NodePayload;
use codecanvas::pipeline::{Analyzer, CanvasError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serves a fixed set of files; counts tree fetches so tests can tell
/// whether the cache was consulted.
struct MockFetcher {
    files: HashMap<String, String>,
    failing_paths: Vec<String>,
    tree_delay: Option<Duration>,
    tree_fetches: AtomicUsize,
}

impl MockFetcher {
    fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
            failing_paths: Vec::new(),
            tree_delay: None,
            tree_fetches: AtomicUsize::new(0),
        }
    }

    fn failing(mut self, path: &str) -> Self {
        self.failing_paths.push(path.to_string());
        self
    }

    /// Hold the tree fetch open so a run stays in flight.
    fn delayed(mut self, delay: Duration) -> Self {
        self.tree_delay = Some(delay);
        self
    }
}

#[async_trait]
impl RepoFetcher for MockFetcher {
    async fn fetch_tree(&self, _owner: &str, _repo: &str) -> Result<RepoTree, FetchError> {
        self.tree_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.tree_delay {
            tokio::time::sleep(delay).await;
        }
        let mut paths: Vec<&String> = self.files.keys().collect();
        paths.sort();
        Ok(RepoTree {
            files: paths
                .into_iter()
                .map(|p| RepoFile {
                    path: p.clone(),
                    size: 100,
                })
                .collect(),
            sha: "abc123".to_string(),
            warnings: Vec::new(),
            truncated: false,
        })
    }

    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, FetchError> {
        if self.failing_paths.iter().any(|p| p == path) {
            return Err(FetchError::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
            });
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
            })
    }
}

fn spec() -> RepoSpec {
    RepoSpec {
        owner: "acme".to_string(),
        repo: "site".to_string(),
    }
}

#[tokio::test]
async fn analyze_produces_a_positioned_graph() {
    let fetcher = MockFetcher::new(&[
        ("src/app.ts", "import Button from \"./components/button\";\nimport { helper } from \"@/lib/helper\";\n"),
        ("src/components/button.tsx", "export default function Button() { return <button />; }"),
        ("lib/helper.ts", "export const helper = 1;"),
        ("README.md", "# docs"),
    ]);
    let config = Config::default();
    let analyzer = Analyzer::new(&fetcher, &config);

    let report = analyzer
        .analyze(&spec(), Direction::TopToBottom, None, |_| {})
        .await
        .unwrap();

    assert!(!report.from_cache);
    assert_eq!(report.total_files, 4);
    // README.md is not parseable.
    assert_eq!(report.parseable_files, 3);
    assert_eq!(report.analyzed_files, 3);

    let graph = &report.graph;
    assert_eq!(graph.metadata.owner, "acme");
    assert_eq!(graph.metadata.sha, "abc123");
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.edges.len(), 2);

    // Both imports resolved: relative with extension fallback and alias.
    let edge_targets: Vec<&str> = graph.edges.iter().map(|e| e.target.as_str()).collect();
    assert!(edge_targets.contains(&"src/components/button.tsx"));
    assert!(edge_targets.contains(&"lib/helper.ts"));

    // The default import is styled, the named one is not.
    let button_edge = graph
        .edges
        .iter()
        .find(|e| e.target == "src/components/button.tsx")
        .unwrap();
    assert!(button_edge.has_default_import);

    // Importers sit above their dependencies.
    let y_of = |path: &str| {
        graph
            .nodes
            .iter()
            .find(|n| n.payload.id() == path)
            .unwrap()
            .position
            .y
    };
    assert!(y_of("src/app.ts") < y_of("src/components/button.tsx"));
}

#[tokio::test]
async fn oversized_repositories_are_capped_with_a_warning() {
    let contents: Vec<(String, String)> = (0..250)
        .map(|i| (format!("src/mod{:03}.ts", i), "export const x = 1;".to_string()))
        .collect();
    let refs: Vec<(&str, &str)> = contents
        .iter()
        .map(|(p, c)| (p.as_str(), c.as_str()))
        .collect();
    let fetcher = MockFetcher::new(&refs);
    let config = Config::default();
    let analyzer = Analyzer::new(&fetcher, &config);

    let report = analyzer
        .analyze(&spec(), Direction::TopToBottom, None, |_| {})
        .await
        .unwrap();

    assert_eq!(report.parseable_files, 250);
    assert_eq!(report.analyzed_files, 200);
    assert_eq!(report.graph.nodes.len(), 200);
    assert_eq!(
        report.graph.warnings,
        vec!["Repository has 250 parseable files. Analyzing first 200 files.".to_string()]
    );
}

#[tokio::test]
async fn failed_file_fetches_become_failure_nodes() {
    let fetcher = MockFetcher::new(&[
        ("src/a.ts", "import { b } from \"./b\";"),
        ("src/b.ts", "export const b = 1;"),
    ])
    .failing("src/b.ts");
    let config = Config::default();
    let analyzer = Analyzer::new(&fetcher, &config);

    let report = analyzer
        .analyze(&spec(), Direction::TopToBottom, None, |_| {})
        .await
        .unwrap();

    // The failed file still appears as a node and as an edge target.
    assert_eq!(report.graph.nodes.len(), 2);
    assert_eq!(report.graph.edges.len(), 1);

    let failures: Vec<_> = report.graph.parse_failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "src/b.ts");
    assert!(failures[0].1.contains("Failed to fetch file"));
}

#[tokio::test]
async fn second_run_is_served_from_the_cache() {
    let fetcher = MockFetcher::new(&[("src/a.ts", "export const a = 1;")]);
    let config = Config::default();
    let analyzer = Analyzer::new(&fetcher, &config);

    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    let fs = RealFs::new();
    let clock = SystemClock;
    let mut cache: SnapshotCache<'_, CanvasGraph> =
        SnapshotCache::load(&fs, &clock, &cache_path, 3600, 50);

    let first = analyzer
        .analyze(&spec(), Direction::TopToBottom, Some(&mut cache), |_| {})
        .await
        .unwrap();
    assert!(!first.from_cache);
    assert_eq!(fetcher.tree_fetches.load(Ordering::SeqCst), 1);

    let second = analyzer
        .analyze(&spec(), Direction::TopToBottom, Some(&mut cache), |_| {})
        .await
        .unwrap();
    assert!(second.from_cache);
    assert_eq!(second.graph, first.graph);
    // No further network traffic.
    assert_eq!(fetcher.tree_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn overlapping_analyses_are_rejected() {
    let fetcher = MockFetcher::new(&[("src/a.ts", "export const a = 1;")])
        .delayed(Duration::from_millis(50));
    let config = Config::default();
    let analyzer = Analyzer::new(&fetcher, &config);

    // join! polls in order: the first call takes the busy flag and parks
    // inside the tree fetch, so the second is rejected while it runs.
    let spec = spec();
    let (first, second) = tokio::join!(
        analyzer.analyze(&spec, Direction::TopToBottom, None, |_| {}),
        analyzer.analyze(&spec, Direction::TopToBottom, None, |_| {}),
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(CanvasError::AnalysisInFlight)));
    // Only the winning run reached the network.
    assert_eq!(fetcher.tree_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn analyzer_is_reusable_after_a_run() {
    let fetcher = MockFetcher::new(&[("src/a.ts", "export const a = 1;")]);
    let config = Config::default();
    let analyzer = Analyzer::new(&fetcher, &config);

    let first = analyzer
        .analyze(&spec(), Direction::TopToBottom, None, |_| {})
        .await;
    assert!(first.is_ok());

    // The in-flight guard resets once a run finishes.
    let second = analyzer
        .analyze(&spec(), Direction::TopToBottom, None, |_| {})
        .await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn file_tree_builds_the_directory_hierarchy() {
    let fetcher = MockFetcher::new(&[
        ("src/a.ts", "export const a = 1;"),
        ("src/lib/b.ts", "export const b = 1;"),
        ("README.md", "# docs"),
    ]);
    let config = Config::default();
    let analyzer = Analyzer::new(&fetcher, &config);

    let graph = analyzer.file_tree(&spec()).await.unwrap();

    // src, src/lib, and three files (the tree view keeps non-source files).
    assert_eq!(graph.nodes.len(), 5);
    let dirs: Vec<&str> = graph
        .nodes
        .iter()
        .filter_map(|n| match &n.payload {
            NodePayload::Directory(d) => Some(d.path.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(dirs, vec!["src", "src/lib"]);

    assert!(graph
        .edges
        .iter()
        .any(|e| e.source == "src" && e.target == "src/lib"));
}

#[tokio::test]
async fn progress_reports_every_stage_in_order() {
    use codecanvas::pipeline::Progress;

    let fetcher = MockFetcher::new(&[
        ("src/a.ts", "export const a = 1;"),
        ("src/b.ts", "export const b = 1;"),
    ]);
    let config = Config::default();
    let analyzer = Analyzer::new(&fetcher, &config);

    let mut events = Vec::new();
    analyzer
        .analyze(&spec(), Direction::TopToBottom, None, |e| events.push(e))
        .await
        .unwrap();

    assert_eq!(events[0], Progress::FetchingTree);
    assert_eq!(
        events[1],
        Progress::ParsingFile {
            current: 1,
            total: 2,
            path: "src/a.ts".to_string()
        }
    );
    assert_eq!(events[events.len() - 2], Progress::BuildingGraph);
    assert_eq!(events[events.len() - 1], Progress::ApplyingLayout);
}

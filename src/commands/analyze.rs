use super::{CommandContext, emit};
use crate::cache::{CACHE_FILE, SnapshotCache, SystemClock};
use crate::cli::AnalyzeArgs;
use crate::fs::default_fs;
use crate::github::{GitHubClient, parse_repo_spec};
use crate::graph::CanvasGraph;
use crate::pipeline::{Analyzer, Progress};
use crate::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub fn cmd_analyze(args: AnalyzeArgs) -> i32 {
    let ctx = CommandContext::new();

    let spec = match parse_repo_spec(&args.repo) {
        Ok(spec) => spec,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to create async runtime: {}", e));
            return 1;
        }
    };

    let client = GitHubClient::new(ctx.config.fetch.token.clone(), ctx.config.tree_filter());
    let analyzer = Analyzer::new(&client, &ctx.config);

    let fs = default_fs();
    let clock = SystemClock;
    let mut cache: SnapshotCache<'_, CanvasGraph> = SnapshotCache::load(
        fs,
        &clock,
        Path::new(CACHE_FILE),
        ctx.config.cache.ttl_secs,
        ctx.config.cache.max_entries,
    );
    let cache = (!args.no_cache).then_some(&mut cache);

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("progress bar template is a valid static string"),
    );
    bar.enable_steady_tick(Duration::from_millis(100));

    let on_progress = |event: Progress| match event {
        Progress::FetchingTree => bar.set_message("Fetching repository tree"),
        Progress::ParsingFile {
            current,
            total,
            path,
        } => bar.set_message(format!("Parsing {}/{}: {}", current, total, path)),
        Progress::BuildingGraph => bar.set_message("Building dependency graph"),
        Progress::ApplyingLayout => bar.set_message("Applying layout"),
    };

    let result = rt.block_on(analyzer.analyze(&spec, args.direction.into(), cache, on_progress));
    bar.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    if report.from_cache {
        style::status(&format!(
            "Using cached snapshot for {}",
            style::repo(&spec.to_string())
        ));
    } else {
        style::status(&format!(
            "Analyzed {} of {} parseable files in {}",
            report.analyzed_files,
            report.parseable_files,
            style::repo(&spec.to_string())
        ));
    }
    for warning in &report.graph.warnings {
        style::warning(warning);
    }

    emit(&report.graph, args.format, args.output.as_deref())
}

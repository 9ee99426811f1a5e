use super::CommandContext;
use crate::cache::{CACHE_FILE, SnapshotCache, SystemClock};
use crate::cli::{CacheAction, CacheArgs};
use crate::fs::default_fs;
use crate::graph::CanvasGraph;
use crate::style;
use std::path::Path;

pub fn cmd_cache(args: CacheArgs) -> i32 {
    let ctx = CommandContext::new();

    let fs = default_fs();
    let clock = SystemClock;
    let mut cache: SnapshotCache<'_, CanvasGraph> = SnapshotCache::load(
        fs,
        &clock,
        Path::new(CACHE_FILE),
        ctx.config.cache.ttl_secs,
        ctx.config.cache.max_entries,
    );

    match args.action {
        CacheAction::Stats => {
            let stats = cache.stats();
            println!("Snapshot cache at {}", style::path(cache.path()));
            println!("{}", style::metric("snapshots", stats.total));
            println!("{}", style::metric("stale", stats.expired));
            println!("{}", style::metric("capacity", stats.capacity));
            println!("{}", style::metric("ttl (seconds)", stats.ttl_secs));
            0
        }
        CacheAction::Clear => {
            let count = cache.len();
            match cache.clear() {
                Ok(()) => {
                    style::success(&format!(
                        "Removed {} cached {}",
                        count,
                        if count == 1 { "snapshot" } else { "snapshots" }
                    ));
                    0
                }
                Err(e) => {
                    style::error(&format!("Failed to clear cache: {}", e));
                    1
                }
            }
        }
    }
}

//! Durable snapshot cache for analysis results.
//!
//! Entries expire after a TTL and the cache holds a bounded number of
//! them, evicting the oldest insertion when full. Setting an existing
//! key refreshes its value and timestamp without changing its position
//! in the eviction order. The whole cache mirrors to a single JSON file
//! so snapshots survive across runs.

use crate::fs::FileSystem;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Snapshots older than this are discarded on lookup.
pub const DEFAULT_TTL_SECS: u64 = 60 * 60;

/// Bound on stored snapshots.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Relative path of the cache mirror.
pub const CACHE_FILE: &str = ".codecanvas/cache.json";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Source of "now" in seconds since the epoch, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry<T> {
    value: T,
    stored_at: u64,
}

/// Summary counts for the `cache stats` command.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub total: usize,
    pub expired: usize,
    pub capacity: usize,
    pub ttl_secs: u64,
}

pub struct SnapshotCache<'a, T> {
    // Insertion order doubles as eviction order.
    entries: Vec<(String, Entry<T>)>,
    ttl_secs: u64,
    max_entries: usize,
    path: PathBuf,
    fs: &'a dyn FileSystem,
    clock: &'a dyn Clock,
}

impl<'a, T> SnapshotCache<'a, T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Load the cache mirror from disk. A missing or unreadable file
    /// starts an empty cache rather than failing the command; entries that
    /// expired since the last run are dropped here.
    pub fn load(
        fs: &'a dyn FileSystem,
        clock: &'a dyn Clock,
        path: &Path,
        ttl_secs: u64,
        max_entries: usize,
    ) -> Self {
        let now = clock.now();
        let mut entries = fs
            .read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str::<Vec<(String, Entry<T>)>>(&raw).ok())
            .unwrap_or_default();
        entries.retain(|(_, entry)| now.saturating_sub(entry.stored_at) <= ttl_secs);

        Self {
            entries,
            ttl_secs,
            max_entries,
            path: path.to_path_buf(),
            fs,
            clock,
        }
    }

    /// Look up a snapshot, discarding it if the TTL has lapsed.
    pub fn get(&mut self, key: &str) -> Result<Option<T>, CacheError> {
        let Some(index) = self.entries.iter().position(|(k, _)| k == key) else {
            return Ok(None);
        };

        if self.is_expired(&self.entries[index].1) {
            self.entries.remove(index);
            self.persist()?;
            return Ok(None);
        }

        Ok(Some(self.entries[index].1.value.clone()))
    }

    /// Store a snapshot. An existing key is refreshed in place; a new key
    /// evicts the oldest insertion once the cache is full.
    pub fn set(&mut self, key: &str, value: T) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            stored_at: self.clock.now(),
        };

        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| k == key) {
            existing.1 = entry;
        } else {
            if self.entries.len() >= self.max_entries {
                self.entries.remove(0);
            }
            self.entries.push((key.to_string(), entry));
        }

        self.persist()
    }

    /// Drop a single snapshot if present.
    pub fn remove(&mut self, key: &str) -> Result<bool, CacheError> {
        let Some(index) = self.entries.iter().position(|(k, _)| k == key) else {
            return Ok(false);
        };
        self.entries.remove(index);
        self.persist()?;
        Ok(true)
    }

    /// Drop all snapshots and delete the mirror file.
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.entries.clear();
        self.fs.remove_file(&self.path)?;
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        let expired = self
            .entries
            .iter()
            .filter(|(_, entry)| self.is_expired(entry))
            .count();
        CacheStats {
            total: self.entries.len(),
            expired,
            capacity: self.max_entries,
            ttl_secs: self.ttl_secs,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_expired(&self, entry: &Entry<T>) -> bool {
        self.clock.now().saturating_sub(entry.stored_at) > self.ttl_secs
    }

    fn persist(&self) -> Result<(), CacheError> {
        let raw = serde_json::to_string(&self.entries)?;
        self.fs.write(&self.path, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct MockClock {
        now: AtomicU64,
    }

    impl MockClock {
        fn at(secs: u64) -> Self {
            Self {
                now: AtomicU64::new(secs),
            }
        }

        fn advance(&self, secs: u64) {
            self.now.fetch_add(secs, Ordering::SeqCst);
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> u64 {
            self.now.load(Ordering::SeqCst)
        }
    }

    fn cache_path() -> PathBuf {
        PathBuf::from(CACHE_FILE)
    }

    fn new_cache<'a>(
        fs: &'a MockFs,
        clock: &'a MockClock,
    ) -> SnapshotCache<'a, String> {
        SnapshotCache::load(fs, clock, &cache_path(), DEFAULT_TTL_SECS, 3)
    }

    #[test]
    fn set_then_get_round_trips() {
        let fs = MockFs::new();
        let clock = MockClock::at(1_000);
        let mut cache = new_cache(&fs, &clock);

        cache.set("acme/site", "snapshot".to_string()).unwrap();
        assert_eq!(cache.get("acme/site").unwrap().as_deref(), Some("snapshot"));
    }

    #[test]
    fn expired_entries_are_discarded_on_lookup() {
        let fs = MockFs::new();
        let clock = MockClock::at(1_000);
        let mut cache = new_cache(&fs, &clock);

        cache.set("acme/site", "snapshot".to_string()).unwrap();
        clock.advance(DEFAULT_TTL_SECS + 1);

        assert_eq!(cache.get("acme/site").unwrap(), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn entry_just_inside_ttl_survives() {
        let fs = MockFs::new();
        let clock = MockClock::at(1_000);
        let mut cache = new_cache(&fs, &clock);

        cache.set("acme/site", "snapshot".to_string()).unwrap();
        clock.advance(DEFAULT_TTL_SECS);

        assert!(cache.get("acme/site").unwrap().is_some());
    }

    #[test]
    fn full_cache_evicts_oldest_insertion() {
        let fs = MockFs::new();
        let clock = MockClock::at(1_000);
        let mut cache = new_cache(&fs, &clock);

        cache.set("a/a", "1".to_string()).unwrap();
        cache.set("b/b", "2".to_string()).unwrap();
        cache.set("c/c", "3".to_string()).unwrap();
        cache.set("d/d", "4".to_string()).unwrap();

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a/a").unwrap(), None);
        assert!(cache.get("b/b").unwrap().is_some());
        assert!(cache.get("d/d").unwrap().is_some());
    }

    #[test]
    fn refreshing_a_key_keeps_its_eviction_position() {
        let fs = MockFs::new();
        let clock = MockClock::at(1_000);
        let mut cache = new_cache(&fs, &clock);

        cache.set("a/a", "1".to_string()).unwrap();
        cache.set("b/b", "2".to_string()).unwrap();
        cache.set("c/c", "3".to_string()).unwrap();
        // Refresh the oldest key, then overflow.
        cache.set("a/a", "1-new".to_string()).unwrap();
        cache.set("d/d", "4".to_string()).unwrap();

        // "a/a" kept its original slot, so it was still first out.
        assert_eq!(cache.get("a/a").unwrap(), None);
        assert!(cache.get("b/b").unwrap().is_some());
    }

    #[test]
    fn cache_persists_across_loads() {
        let fs = MockFs::new();
        let clock = MockClock::at(1_000);

        {
            let mut cache = new_cache(&fs, &clock);
            cache.set("acme/site", "snapshot".to_string()).unwrap();
        }

        let mut reloaded = new_cache(&fs, &clock);
        assert_eq!(
            reloaded.get("acme/site").unwrap().as_deref(),
            Some("snapshot")
        );
    }

    #[test]
    fn reload_drops_entries_that_expired_in_between() {
        let fs = MockFs::new();
        let clock = MockClock::at(1_000);

        {
            let mut cache = new_cache(&fs, &clock);
            cache.set("acme/site", "snapshot".to_string()).unwrap();
        }

        clock.advance(DEFAULT_TTL_SECS + 1);
        let reloaded = new_cache(&fs, &clock);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn corrupt_mirror_starts_empty() {
        let fs = MockFs::with_files([(cache_path(), "not json {{{")]);
        let clock = MockClock::at(1_000);
        let mut cache = new_cache(&fs, &clock);

        assert!(cache.is_empty());
        assert_eq!(cache.get("acme/site").unwrap(), None);
    }

    #[test]
    fn clear_removes_entries_and_mirror() {
        let fs = MockFs::new();
        let clock = MockClock::at(1_000);
        let mut cache = new_cache(&fs, &clock);

        cache.set("acme/site", "snapshot".to_string()).unwrap();
        assert!(fs.exists(&cache_path()));

        cache.clear().unwrap();
        assert!(cache.is_empty());
        assert!(!fs.exists(&cache_path()));
    }

    #[test]
    fn stats_count_expired_entries() {
        let fs = MockFs::new();
        let clock = MockClock::at(1_000);
        let mut cache = new_cache(&fs, &clock);

        cache.set("a/a", "1".to_string()).unwrap();
        clock.advance(DEFAULT_TTL_SECS + 1);
        cache.set("b/b", "2".to_string()).unwrap();

        let stats = cache.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.capacity, 3);
    }
}

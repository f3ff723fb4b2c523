// src/core/state.rs

//! Shared runtime state of the engine: per-entry write locks and operation
//! counters.

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Holds the concurrency scopes and counters shared by all operations.
#[derive(Debug, Default)]
pub struct CacheState {
    /// Per-entry locks scoping the combined "ensure directory + write both
    /// files" sequence, restoring at-most-one-writer semantics per entry.
    entry_locks: DashMap<PathBuf, Arc<Mutex<()>>>,
    /// Orders whole-cache clears (write side) against stores and
    /// single-entry invalidations (read side).
    pub root_lock: RwLock<()>,
    /// Counter for stored entries.
    pub stores: AtomicU64,
    /// Counter for presence probes that found an entry.
    pub hits: AtomicU64,
    /// Counter for presence probes that found nothing.
    pub misses: AtomicU64,
    /// Counter for single-entry invalidations.
    pub invalidations: AtomicU64,
    /// Counter for whole-cache clears.
    pub full_clears: AtomicU64,
}

impl CacheState {
    /// Returns the write lock for one entry directory, creating it on
    /// first use.
    pub fn entry_lock(&self, dir: &Path) -> Arc<Mutex<()>> {
        self.entry_locks
            .entry(dir.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops an entry lock from the map once the last writer released it,
    /// so the map does not grow with the number of distinct URLs stored.
    pub fn release_entry_lock(&self, dir: &Path) {
        self.entry_locks
            .remove_if(dir, |_, lock| Arc::strong_count(lock) <= 1);
    }

    /// Atomically increments the counter for presence-probe hits.
    pub fn increment_hits(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Atomically increments the counter for presence-probe misses.
    pub fn increment_misses(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time view of the counters, with the current disk usage
    /// filled in by the caller.
    pub fn snapshot(&self, disk_usage_bytes: u64) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            stores: self.stores.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            full_clears: self.full_clears.load(Ordering::Relaxed),
            disk_usage_bytes,
        }
    }
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub stores: u64,
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub full_clears: u64,
    /// Aggregate size of everything under the cache root; zero when the
    /// root is absent or empty.
    pub disk_usage_bytes: u64,
}

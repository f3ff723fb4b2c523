// src/core/engine.rs

//! The engine facade: ties path resolution, entry IO, and tree maintenance
//! together behind one handle the serving layer talks to.

use crate::config::CacheConfig;
use crate::core::errors::PeridotError;
use crate::core::key::CacheKey;
use crate::core::paths::PathResolver;
use crate::core::signature;
use crate::core::state::{CacheState, CacheStatsSnapshot};
use crate::core::storage::entry;
use crate::core::storage::tree::{self, ClearOutcome};
use bytes::Bytes;
use std::path::Path;
use std::sync::atomic::Ordering;
use tracing::{debug, info};

/// A disk-backed page cache rooted at one configured directory.
///
/// All operations are bounded sequences of filesystem calls; there is no
/// cancellation or timeout concept. Stores for the same entry serialize on
/// a per-entry lock; whole-cache clears exclude every other mutation.
#[derive(Debug)]
pub struct DiskCache {
    resolver: PathResolver,
    state: CacheState,
    strict_clear: bool,
}

impl DiskCache {
    /// Builds an engine from its configuration.
    ///
    /// The engine can only derive storage locations when the host routes
    /// requests through non-trivial URLs, so a configuration with
    /// `pretty_urls` off is rejected outright.
    pub fn new(config: &CacheConfig) -> Result<Self, PeridotError> {
        if !config.pretty_urls {
            return Err(PeridotError::Disabled);
        }

        Ok(Self {
            resolver: PathResolver::new(&config.root_dir),
            state: CacheState::default(),
            strict_clear: config.strict_clear,
        })
    }

    /// Fixed label identifying this caching backend.
    pub fn method_label(&self) -> &'static str {
        signature::method_label()
    }

    /// The configured cache root.
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// Stores a fully rendered page under the location derived from `key`.
    ///
    /// The signature trailer is appended, then the plain and compressed
    /// copies are written. A re-store for the same key overwrites both
    /// files; there is no update-in-place.
    pub async fn store(&self, key: &CacheKey, content: Bytes) -> Result<(), PeridotError> {
        if content.is_empty() {
            return Err(PeridotError::EmptyContent);
        }

        let dir = self.resolver.resolve(key)?;

        let trailer = signature::signature();
        let mut data = Vec::with_capacity(content.len() + trailer.len());
        data.extend_from_slice(&content);
        data.extend_from_slice(trailer.as_bytes());

        let _root_guard = self.state.root_lock.read().await;
        let lock = self.state.entry_lock(&dir);
        let result = {
            let _entry_guard = lock.lock().await;
            entry::write_entry(&dir, &data).await
        };
        drop(lock);
        self.state.release_entry_lock(&dir);
        result?;

        self.state.stores.fetch_add(1, Ordering::Relaxed);
        debug!("stored cache entry at {}", dir.display());
        Ok(())
    }

    /// True when a plain cache file for `key` is present and readable.
    /// Presence is the entire signal: no content validation, no staleness.
    pub async fn exists(&self, key: &CacheKey) -> Result<bool, PeridotError> {
        let dir = self.resolver.resolve(key)?;
        let present = entry::entry_exists(&dir).await;
        if present {
            self.state.increment_hits();
        } else {
            self.state.increment_misses();
        }
        Ok(present)
    }

    /// Removes the entry directory for `key`, including any descendant
    /// entries nested beneath it. Absent entries are a no-op.
    pub async fn invalidate(&self, key: &CacheKey) -> Result<(), PeridotError> {
        let dir = self.resolver.resolve(key)?;

        let _root_guard = self.state.root_lock.read().await;
        let outcome = tree::remove_tree(&dir).await;

        self.state.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!(
            "invalidated {} ({} removed, {} failed)",
            dir.display(),
            outcome.removed,
            outcome.failed
        );
        self.check_outcome(outcome)
    }

    /// Invalidates the entry a full permalink URL points at.
    pub async fn invalidate_url(&self, url: &str) -> Result<(), PeridotError> {
        self.invalidate(&CacheKey::from_url(url)?).await
    }

    /// Removes every entry under the cache root. The root itself is
    /// removed too and recreated lazily by the next store, so clearing an
    /// already-cleared cache is a no-op.
    pub async fn clear(&self) -> Result<(), PeridotError> {
        let _root_guard = self.state.root_lock.write().await;
        let outcome = tree::remove_tree(self.resolver.root()).await;

        self.state.full_clears.fetch_add(1, Ordering::Relaxed);
        info!(
            "cache cleared ({} removed, {} failed)",
            outcome.removed, outcome.failed
        );
        self.check_outcome(outcome)
    }

    /// Aggregate size in bytes of everything under the cache root, or
    /// `None` when the root is absent or holds no entries.
    pub async fn size(&self) -> Option<u64> {
        tree::tree_size(self.resolver.root()).await
    }

    /// Point-in-time operation counters plus current disk usage.
    pub async fn stats(&self) -> CacheStatsSnapshot {
        self.state.snapshot(self.size().await.unwrap_or(0))
    }

    fn check_outcome(&self, outcome: ClearOutcome) -> Result<(), PeridotError> {
        if self.strict_clear && outcome.failed > 0 {
            return Err(PeridotError::ClearIncomplete(outcome.failed));
        }
        Ok(())
    }
}

// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

use peridot::config::CacheConfig;
use peridot::{CacheKey, DiskCache, Scheme};
use std::path::PathBuf;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// TestContext provides a disk cache rooted in a fresh temporary directory.
///
/// The cache root is a subdirectory of the temp dir that is *not*
/// pre-created, so tests can assert that failed operations leave no trace.
pub struct TestContext {
    pub cache: DiskCache,
    pub root: PathBuf,
    _dir: TempDir,
}

impl TestContext {
    /// Creates a new test context with default configuration.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = CacheConfig::default();
        config.root_dir = dir
            .path()
            .join("cache")
            .to_string_lossy()
            .into_owned();
        Self::with_config(config, dir)
    }

    /// Creates a new test context with custom configuration.
    pub fn with_config(config: CacheConfig, dir: TempDir) -> Self {
        // Set up minimal tracing for tests (ignore error if already initialized).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("warn"))
            .with_test_writer()
            .try_init();

        let root = PathBuf::from(&config.root_dir);
        let cache = DiskCache::new(&config).expect("Failed to initialize disk cache");

        Self {
            cache,
            root,
            _dir: dir,
        }
    }
}

/// Shorthand for a plain-scheme cache key.
pub fn http_key(host: &str, path: &str) -> CacheKey {
    CacheKey::new(Scheme::Http, host, path)
}

/// Shorthand for a secure-scheme cache key.
pub fn https_key(host: &str, path: &str) -> CacheKey {
    CacheKey::new(Scheme::Https, host, path)
}

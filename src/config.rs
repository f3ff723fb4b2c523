// src/config.rs

//! Manages engine configuration: loading, defaults, and validation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// The validated engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Base directory all cache entries live under.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    /// The engine only derives storage locations when the host routes
    /// requests through non-trivial ("pretty") URLs. The hosting system
    /// supplies this flag; the engine does not compute it.
    #[serde(default = "default_pretty_urls")]
    pub pretty_urls: bool,
    /// When true, a clear that could not remove every entry is reported as
    /// an error. When false (the default), individual removal failures are
    /// logged and the sweep continues.
    #[serde(default)]
    pub strict_clear: bool,
    /// Default tracing filter for embedding applications.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_dir() -> String {
    "peridot_cache".to_string()
}
fn default_pretty_urls() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            pretty_urls: default_pretty_urls(),
            strict_clear: false,
            log_level: default_log_level(),
        }
    }
}

impl CacheConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: CacheConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;
        Ok(config)
    }
}

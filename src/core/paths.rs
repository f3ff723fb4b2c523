// src/core/paths.rs

//! Resolves request coordinates to validated entry directories under the
//! cache root.

use crate::core::errors::PeridotError;
use crate::core::key::CacheKey;
use std::path::{Component, Path, PathBuf};

/// File name of the plain-content copy inside an entry directory.
pub const HTML_FILE: &str = "index.html";
/// File name of the gzip-compressed copy inside an entry directory.
pub const GZIP_FILE: &str = "index.html.gz";

/// Derives on-disk locations from cache keys and guards the cache root
/// against path traversal.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured cache root all entries live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a key to its entry directory:
    /// `<root>/[https-]<host>/<path segments>`.
    ///
    /// The host is lower-cased and only the path component of the URL
    /// participates; query string and fragment are stripped before the
    /// path is assembled.
    pub fn resolve(&self, key: &CacheKey) -> Result<PathBuf, PeridotError> {
        let host = key.host.trim().to_ascii_lowercase();
        if host.is_empty() {
            return Err(PeridotError::InvalidPath("empty request host".to_string()));
        }

        let url_path = strip_query_and_fragment(&key.path);

        let mut dir = self
            .root
            .join(format!("{}{}", key.scheme.dir_prefix(), host));
        for segment in url_path.split('/').filter(|s| !s.is_empty()) {
            dir.push(segment);
        }

        // Host and path come from untrusted request data, so the check
        // runs on the fully assembled path, not the raw inputs.
        self.validate(&dir)?;
        Ok(dir)
    }

    /// Path to the plain-content file of a resolved entry.
    pub fn html_file(&self, resolved: &Path) -> PathBuf {
        resolved.join(HTML_FILE)
    }

    /// Path to the compressed file of a resolved entry.
    pub fn gzip_file(&self, resolved: &Path) -> PathBuf {
        resolved.join(GZIP_FILE)
    }

    fn validate(&self, resolved: &Path) -> Result<(), PeridotError> {
        if resolved.as_os_str().is_empty() {
            return Err(PeridotError::InvalidPath("empty path".to_string()));
        }

        if resolved.to_string_lossy().contains('\0') {
            return Err(PeridotError::InvalidPath(
                "path contains a NUL byte".to_string(),
            ));
        }

        for component in resolved.components() {
            if matches!(component, Component::ParentDir) {
                return Err(PeridotError::InvalidPath(format!(
                    "'{}' contains a parent-directory segment",
                    resolved.display()
                )));
            }
        }

        if !resolved.starts_with(&self.root) {
            return Err(PeridotError::InvalidPath(format!(
                "'{}' escapes the cache root",
                resolved.display()
            )));
        }

        Ok(())
    }
}

/// Only the path component of a request URI participates in resolution.
fn strip_query_and_fragment(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or(path);
    path.split('#').next().unwrap_or(path)
}

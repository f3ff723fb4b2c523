// src/core/errors.rs

//! Defines the primary error type for the cache engine.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the engine.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug)]
pub enum PeridotError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Empty content for cache entry")]
    EmptyContent,

    #[error("Invalid cache path: {0}")]
    InvalidPath(String),

    #[error("Unable to create cache directory: {0}")]
    DirectoryCreate(String),

    #[error("Could not write cache file: {0}")]
    WriteFailed(String),

    #[error("Cache clear left {0} entries behind")]
    ClearIncomplete(u64),

    #[error("Disk cache unavailable: pretty URLs are disabled")]
    Disabled,
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// We wrap it in an Arc to allow for cheap, shared cloning.
impl Clone for PeridotError {
    fn clone(&self) -> Self {
        match self {
            PeridotError::Io(e) => PeridotError::Io(Arc::clone(e)),
            PeridotError::EmptyContent => PeridotError::EmptyContent,
            PeridotError::InvalidPath(s) => PeridotError::InvalidPath(s.clone()),
            PeridotError::DirectoryCreate(s) => PeridotError::DirectoryCreate(s.clone()),
            PeridotError::WriteFailed(s) => PeridotError::WriteFailed(s.clone()),
            PeridotError::ClearIncomplete(n) => PeridotError::ClearIncomplete(*n),
            PeridotError::Disabled => PeridotError::Disabled,
        }
    }
}

impl PartialEq for PeridotError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PeridotError::Io(e1), PeridotError::Io(e2)) => e1.to_string() == e2.to_string(),
            (PeridotError::InvalidPath(s1), PeridotError::InvalidPath(s2)) => s1 == s2,
            (PeridotError::DirectoryCreate(s1), PeridotError::DirectoryCreate(s2)) => s1 == s2,
            (PeridotError::WriteFailed(s1), PeridotError::WriteFailed(s2)) => s1 == s2,
            (PeridotError::ClearIncomplete(n1), PeridotError::ClearIncomplete(n2)) => n1 == n2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for PeridotError {
    fn from(e: std::io::Error) -> Self {
        PeridotError::Io(Arc::new(e))
    }
}

impl From<url::ParseError> for PeridotError {
    fn from(e: url::ParseError) -> Self {
        PeridotError::InvalidPath(format!("not a valid URL: {e}"))
    }
}

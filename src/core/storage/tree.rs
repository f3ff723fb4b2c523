// src/core/storage/tree.rs

//! Directory-subtree removal and measurement.
//!
//! Both walks are iterative with an explicit work list, so call depth never
//! grows with URL nesting depth. A missing or non-directory target is an
//! expected condition for both operations, never an error.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Tally of a best-effort subtree removal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Files and directories actually removed.
    pub removed: u64,
    /// Entries that could not be removed or read.
    pub failed: u64,
}

/// Removes every file and subdirectory under `dir`, then `dir` itself.
///
/// No-op when `dir` is absent, not a directory, or empty. Individual
/// failures are logged and tallied but never abort the sweep; the caller
/// decides what a non-zero `failed` count means.
pub async fn remove_tree(dir: &Path) -> ClearOutcome {
    let mut outcome = ClearOutcome::default();

    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return outcome,
    }

    // An empty target directory is left in place.
    match first_entry(dir).await {
        Ok(Some(_)) => {}
        Ok(None) => return outcome,
        Err(e) => {
            warn!("could not read cache directory {}: {e}", dir.display());
            outcome.failed += 1;
            return outcome;
        }
    }

    // Pass one: walk the tree breadth-first, unlinking files as they are
    // found and recording directories in discovery order.
    let mut dirs: Vec<PathBuf> = vec![dir.to_path_buf()];
    let mut cursor = 0;
    while cursor < dirs.len() {
        let current = dirs[cursor].clone();
        cursor += 1;

        let mut entries = match tokio::fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("could not read cache directory {}: {e}", current.display());
                outcome.failed += 1;
                continue;
            }
        };

        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
                    if is_dir {
                        dirs.push(path);
                    } else {
                        match tokio::fs::remove_file(&path).await {
                            Ok(()) => outcome.removed += 1,
                            Err(e) => {
                                warn!("could not unlink cache file {}: {e}", path.display());
                                outcome.failed += 1;
                            }
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("could not read cache directory {}: {e}", current.display());
                    outcome.failed += 1;
                    break;
                }
            }
        }
    }

    // Pass two: remove the recorded directories children-first.
    for current in dirs.iter().rev() {
        match tokio::fs::remove_dir(current).await {
            Ok(()) => outcome.removed += 1,
            Err(e) => {
                warn!("could not remove cache directory {}: {e}", current.display());
                outcome.failed += 1;
            }
        }
    }

    outcome
}

/// Total byte size of all files under `dir`.
///
/// `None` when `dir` is absent, not a directory, or empty; the caller
/// decides whether that means zero. Symbolic links count as whatever entry
/// type the filesystem reports for them.
pub async fn tree_size(dir: &Path) -> Option<u64> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return None,
    }

    match first_entry(dir).await {
        Ok(Some(_)) => {}
        _ => return None,
    }

    let mut total: u64 = 0;
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let mut entries = match tokio::fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!("skipping unreadable directory {}: {e}", current.display());
                continue;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            match entry.metadata().await {
                Ok(meta) if meta.is_dir() => stack.push(entry.path()),
                Ok(meta) => total += meta.len(),
                Err(e) => {
                    debug!("skipping unreadable entry {}: {e}", entry.path().display());
                }
            }
        }
    }

    Some(total)
}

/// Peeks at the first directory entry, distinguishing "empty" from
/// "unreadable".
async fn first_entry(dir: &Path) -> std::io::Result<Option<tokio::fs::DirEntry>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    entries.next_entry().await
}

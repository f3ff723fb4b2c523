// src/core/storage/entry.rs

//! Writes and probes the pair of files that make up a cache entry.

use crate::core::errors::PeridotError;
use crate::core::paths::{GZIP_FILE, HTML_FILE};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Creates the entry directory (including missing intermediates) and writes
/// the plain and gzip-compressed files into it.
///
/// The two writes are independent operations, not one atomic transaction;
/// a crash between them can leave a plain file without its compressed twin.
pub async fn write_entry(dir: &Path, data: &[u8]) -> Result<(), PeridotError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| PeridotError::DirectoryCreate(format!("{}: {e}", dir.display())))?;

    write_file(&dir.join(HTML_FILE), data).await?;
    write_file(&dir.join(GZIP_FILE), &gzip(data)?).await?;

    Ok(())
}

/// True when the plain-content file of the entry is present and readable.
/// Presence is the entire signal; the compressed twin and the content
/// itself are not inspected.
pub async fn entry_exists(dir: &Path) -> bool {
    tokio::fs::File::open(dir.join(HTML_FILE)).await.is_ok()
}

/// Truncating whole-buffer write of one cache file.
async fn write_file(path: &Path, data: &[u8]) -> Result<(), PeridotError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| PeridotError::WriteFailed(format!("{}: {e}", path.display())))?;

    file.write_all(data)
        .await
        .map_err(|e| PeridotError::WriteFailed(format!("{}: {e}", path.display())))?;
    file.sync_all()
        .await
        .map_err(|e| PeridotError::WriteFailed(format!("{}: {e}", path.display())))?;

    inherit_permissions(path).await;
    Ok(())
}

/// Compresses a page body at the maximum ratio.
fn gzip(data: &[u8]) -> Result<Vec<u8>, PeridotError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::best());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Cache files inherit the parent directory's permission bits, minus any
/// execute bit. Deployment decides the mode; the engine never hardcodes one.
#[cfg(unix)]
async fn inherit_permissions(path: &Path) {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;
    use tracing::warn;

    let Some(parent) = path.parent() else {
        return;
    };
    let parent_mode = match tokio::fs::metadata(parent).await {
        Ok(meta) => meta.permissions().mode(),
        Err(_) => return,
    };

    let mode = parent_mode & 0o7777 & 0o666;
    if let Err(e) = tokio::fs::set_permissions(path, Permissions::from_mode(mode)).await {
        warn!("could not adjust permissions on {}: {e}", path.display());
    }
}

#[cfg(not(unix))]
async fn inherit_permissions(_path: &Path) {}

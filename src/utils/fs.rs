//! File system helpers for writing component files into a project.
//!
//! Writes go through a temporary sibling file and a rename, so an interrupted
//! install never leaves a half-written component behind. Everything here is
//! async on `tokio::fs` and returns plain [`std::io::Result`]; callers attach
//! the path to the error in their own error type.
//!
//! # Examples
//!
//! ```rust,no_run
//! use kitpm_cli::utils::fs::{ensure_dir, safe_write};
//! use std::path::Path;
//!
//! # async fn example() -> std::io::Result<()> {
//! ensure_dir(Path::new("components/ui")).await?;
//! safe_write(Path::new("components/ui/button.tsx"), "export {}").await?;
//! # Ok(())
//! # }
//! ```

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Create `path` and any missing parents.
///
/// Fails if `path` exists but is not a directory.
pub async fn ensure_dir(path: &Path) -> io::Result<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("path exists but is not a directory: {}", path.display()),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => fs::create_dir_all(path).await,
        Err(e) => Err(e),
    }
}

/// Create the parent directory of a file path if needed.
pub async fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent).await,
        _ => Ok(()),
    }
}

/// Write `content` to `path` atomically, creating parent directories.
///
/// The bytes go to a temporary file next to the target, are synced, then
/// renamed over the target.
pub async fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path).await?;

    let temp_path = temp_sibling(path);
    {
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }
    Ok(())
}

/// [`atomic_write`] for text.
pub async fn safe_write(path: &Path, content: &str) -> io::Result<()> {
    atomic_write(path, content.as_bytes()).await
}

/// Read a UTF-8 file, returning `None` when it does not exist.
pub async fn read_text_if_exists(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".kitpm.tmp");
    path.with_file_name(name)
}

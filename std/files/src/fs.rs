//! Filesystem access behind a trait, so access checks can be tested without
//! touching the disk.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

/// What an entry is, as far as traversal cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    Symlink,
    /// Anything that is neither a directory nor a symlink.
    File,
}

impl From<std::fs::FileType> for EntryKind {
    fn from(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        }
    }
}

/// The filesystem operations the accessor needs.
pub trait Filesystem: Send + Sync {
    /// Paths of the direct entries of `dir`, in enumeration order.
    fn read_dir(&self, dir: &Path) -> impl Future<Output = io::Result<Vec<PathBuf>>> + Send;

    /// Kind of `path`, following symlinks. Never returns [`EntryKind::Symlink`].
    fn metadata(&self, path: &Path) -> impl Future<Output = io::Result<EntryKind>> + Send;

    /// Kind of `path` without following a final symlink.
    fn symlink_metadata(&self, path: &Path) -> impl Future<Output = io::Result<EntryKind>> + Send;

    /// Absolute path with every symlink resolved.
    fn canonicalize(&self, path: &Path) -> impl Future<Output = io::Result<PathBuf>> + Send;

    /// Whole file decoded as UTF-8.
    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send;
}

/// The real filesystem, via `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            entries.push(entry.path());
        }
        Ok(entries)
    }

    async fn metadata(&self, path: &Path) -> io::Result<EntryKind> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(meta.file_type().into())
    }

    async fn symlink_metadata(&self, path: &Path) -> io::Result<EntryKind> {
        let meta = tokio::fs::symlink_metadata(path).await?;
        Ok(meta.file_type().into())
    }

    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        tokio::fs::canonicalize(path).await
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

//! Guarded directory listing and file reading.

use crate::fs::{EntryKind, Filesystem, LocalFs};
use crate::guard::PathGuard;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Errors from [`FileAccessor`] operations.
#[derive(Error, Debug)]
pub enum AccessError {
    /// The path resolves outside every permitted root.
    #[error("path not permitted: {path} (permitted directories: {})", display_roots(.roots))]
    Denied { path: String, roots: Vec<PathBuf> },
    /// The underlying filesystem operation failed.
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Comma separated list of roots, for diagnostics.
pub fn display_roots(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|r| r.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// How symlinks are treated once a path has passed the lexical check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SymlinkPolicy {
    /// Resolve symlinks and require the real location to be permitted too.
    /// Linked directories are never descended while listing.
    #[default]
    Contain,
    /// Trust the lexical check and follow links wherever they point.
    Follow,
}

/// Lists and reads files, but only inside the guard's roots.
#[derive(Debug, Clone)]
pub struct FileAccessor<F = LocalFs> {
    guard: Arc<PathGuard>,
    fs: F,
    symlinks: SymlinkPolicy,
}

impl FileAccessor<LocalFs> {
    /// Accessor over the real filesystem.
    pub fn local(guard: PathGuard) -> Self {
        Self::new(guard, LocalFs)
    }
}

impl<F: Filesystem> FileAccessor<F> {
    pub fn new(guard: PathGuard, fs: F) -> Self {
        Self {
            guard: Arc::new(guard),
            fs,
            symlinks: SymlinkPolicy::default(),
        }
    }

    pub fn with_symlinks(mut self, symlinks: SymlinkPolicy) -> Self {
        self.symlinks = symlinks;
        self
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Every non-directory file below `dir_path`, depth first, in
    /// enumeration order. Any I/O failure fails the whole listing.
    pub async fn list(&self, dir_path: &str) -> Result<Vec<PathBuf>, AccessError> {
        let (dir, real_roots) = self.authorize(dir_path).await?;
        let mut files = Vec::new();
        self.collect(&dir, &real_roots, &mut files).await?;
        tracing::debug!(dir = %dir.display(), count = files.len(), "listed directory");
        Ok(files)
    }

    /// The whole content of `file_path` as UTF-8 text.
    pub async fn read(&self, file_path: &str) -> Result<String, AccessError> {
        let (path, _) = self.authorize(file_path).await?;
        Ok(self.fs.read_to_string(&path).await?)
    }

    /// Resolve `candidate` and prove it is inside a permitted root. The
    /// lexical check runs before any filesystem call. Also returns the
    /// roots' real locations as seen by this call (empty under `Follow`).
    async fn authorize(&self, candidate: &str) -> Result<(PathBuf, Vec<PathBuf>), AccessError> {
        if !self.guard.is_permitted(candidate) {
            tracing::warn!(path = candidate, "access denied");
            return Err(self.denied(candidate));
        }
        let path = self.guard.resolve(candidate);
        if self.symlinks == SymlinkPolicy::Follow {
            return Ok((path, Vec::new()));
        }
        let real = self.fs.canonicalize(&path).await?;
        let real_roots = self.real_roots().await;
        if !self.guard.contains_real(&real, &real_roots) {
            tracing::warn!(path = candidate, real = %real.display(), "access denied: symlink leaves permitted directories");
            return Err(self.denied(candidate));
        }
        Ok((path, real_roots))
    }

    /// Current real location of every root. A root that cannot be resolved
    /// right now is left out.
    async fn real_roots(&self) -> Vec<PathBuf> {
        let mut real_roots = Vec::with_capacity(self.guard.roots().len());
        for root in self.guard.roots() {
            match self.fs.canonicalize(root).await {
                Ok(real) => real_roots.push(real),
                Err(e) => {
                    tracing::debug!(root = %root.display(), "permitted directory is not accessible: {e}");
                }
            }
        }
        real_roots
    }

    fn denied(&self, candidate: &str) -> AccessError {
        AccessError::Denied {
            path: candidate.to_owned(),
            roots: self.guard.roots().to_vec(),
        }
    }

    fn collect<'a>(
        &'a self,
        dir: &'a Path,
        real_roots: &'a [PathBuf],
        files: &'a mut Vec<PathBuf>,
    ) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            for entry in self.fs.read_dir(dir).await? {
                let kind = self.entry_kind(&entry, real_roots).await?;
                match kind {
                    Some(EntryKind::Dir) => self.collect(&entry, real_roots, files).await?,
                    Some(_) => files.push(entry),
                    None => {}
                }
            }
            Ok(())
        })
    }

    /// `None` means the entry is skipped.
    async fn entry_kind(
        &self,
        entry: &Path,
        real_roots: &[PathBuf],
    ) -> io::Result<Option<EntryKind>> {
        match self.symlinks {
            SymlinkPolicy::Follow => self.fs.metadata(entry).await.map(Some),
            SymlinkPolicy::Contain => match self.fs.symlink_metadata(entry).await? {
                EntryKind::Symlink => Ok(self.linked_file(entry, real_roots).await),
                kind => Ok(Some(kind)),
            },
        }
    }

    /// A symlink is listed only when it points at a file inside a permitted root.
    async fn linked_file(&self, link: &Path, real_roots: &[PathBuf]) -> Option<EntryKind> {
        let real = match self.fs.canonicalize(link).await {
            Ok(real) => real,
            Err(e) => {
                tracing::debug!(link = %link.display(), "skipping dangling symlink: {e}");
                return None;
            }
        };
        if !self.guard.contains_real(&real, real_roots) {
            tracing::debug!(link = %link.display(), target = %real.display(), "skipping symlink outside permitted directories");
            return None;
        }
        match self.fs.metadata(&real).await {
            Ok(EntryKind::Dir) => {
                tracing::debug!(link = %link.display(), "not descending into symlinked directory");
                None
            }
            Ok(kind) => Some(kind),
            Err(e) => {
                tracing::debug!(link = %link.display(), "skipping unreadable symlink: {e}");
                None
            }
        }
    }
}

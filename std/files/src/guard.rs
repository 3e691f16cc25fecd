//! Path containment for the files MCP server.
//!
//! Every operation must pass its candidate path through [`PathGuard`] before
//! touching the filesystem. The check is purely lexical: candidates are made
//! absolute, `.` and `..` are collapsed, and the result must equal a
//! permitted root or sit below one on a component boundary.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors from building a [`PathGuard`].
#[derive(Error, Debug)]
pub enum GuardError {
    /// No permitted directory was configured.
    #[error(
        "List of permitted directories needs to be specified before allowing MCP to access your filesystem"
    )]
    NoRoots,
    /// The process working directory could not be determined.
    #[error("cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

/// Immutable set of permitted root directories.
#[derive(Debug, Clone)]
pub struct PathGuard {
    base: PathBuf,
    roots: Vec<PathBuf>,
}

impl PathGuard {
    /// Build a guard whose relative paths resolve against the current
    /// working directory.
    pub fn new<I, P>(dirs: I) -> Result<Self, GuardError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let base = std::env::current_dir().map_err(GuardError::WorkingDir)?;
        Self::with_base(dirs, base)
    }

    /// Build a guard whose relative paths resolve against `base`.
    pub fn with_base<I, P>(dirs: I, base: impl Into<PathBuf>) -> Result<Self, GuardError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let base: PathBuf = base.into();
        let base = normalize(&base);
        let mut roots: Vec<PathBuf> = Vec::new();
        for dir in dirs {
            let root = normalize(&base.join(dir.as_ref()));
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        if roots.is_empty() {
            return Err(GuardError::NoRoots);
        }

        Ok(Self { base, roots })
    }

    /// The permitted roots, in configuration order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Make `candidate` absolute and normalize it. Performs no I/O.
    pub fn resolve(&self, candidate: &str) -> PathBuf {
        let path = Path::new(candidate);
        if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.base.join(path))
        }
    }

    /// Whether `candidate` resolves inside some permitted root.
    pub fn is_permitted(&self, candidate: &str) -> bool {
        if candidate.contains('\0') {
            return false;
        }
        self.contains(&self.resolve(candidate))
    }

    /// Whether an already resolved path is a permitted root or lies below one.
    ///
    /// [`Path::starts_with`] compares whole components, so `/data-secret`
    /// is not inside `/data`.
    pub fn contains(&self, resolved: &Path) -> bool {
        self.roots.iter().any(|root| resolved.starts_with(root))
    }

    /// Like [`contains`](Self::contains) for a path whose symlinks have been
    /// resolved. `real_roots` are the roots' own resolved locations, looked up
    /// by the caller at check time.
    pub fn contains_real(&self, real: &Path, real_roots: &[PathBuf]) -> bool {
        self.contains(real) || real_roots.iter().any(|root| real.starts_with(root))
    }
}

/// Lexically normalize an absolute path: drop `.`, apply `..` by popping the
/// previous component. `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

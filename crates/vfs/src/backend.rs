use anyhow::{bail, Result};
use async_trait::async_trait;
use thiserror::Error;

/// Quota requested for the temporary filesystem (1 MiB)
pub const DEFAULT_QUOTA_BYTES: u64 = 1024 * 1024;

/// A write would take the filesystem past its quota
///
/// Backends return it inside `anyhow::Error`; callers can `downcast_ref` it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Quota exceeded: {path} needs {wanted} of {quota} bytes")]
pub struct QuotaExceeded {
    pub path: String,
    pub wanted: u64,
    pub quota: u64,
}

/// What a directory child is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Anything the backend cannot classify as file or directory
    Other,
}

/// One child returned by `read_dir`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// File metadata returned by stat operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub is_file: bool,
    pub is_dir: bool,
    pub size: u64,
}

impl FileStat {
    pub const fn file(size: u64) -> Self {
        Self {
            is_file: true,
            is_dir: false,
            size,
        }
    }

    pub const fn dir() -> Self {
        Self {
            is_file: false,
            is_dir: true,
            size: 0,
        }
    }

    pub const fn other() -> Self {
        Self {
            is_file: false,
            is_dir: false,
            size: 0,
        }
    }
}

/// Quota-bound, origin-scoped filesystem the bridge answers RPCs from
///
/// Backends are polled on a single event thread, so futures need not be `Send`.
#[async_trait(?Send)]
pub trait SandboxFs {
    /// Get file/directory metadata
    async fn stat(&self, path: &str) -> Result<FileStat>;

    /// List direct children of a directory, in the backend's read order
    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>>;

    /// Byte quota this filesystem was acquired with
    fn quota(&self) -> u64;

    /// Resolve `path` as a directory; files and missing paths are errors
    async fn resolve_dir(&self, path: &str) -> Result<()> {
        if self.stat(path).await?.is_dir {
            Ok(())
        } else {
            bail!("Not a directory: {path}")
        }
    }
}

/// Split a `/`-separated path into its non-empty components
///
/// `.` components are dropped; the empty path and `/` both name the root.
pub fn path_components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|part| !part.is_empty() && *part != ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_components() {
        assert_eq!(path_components("/a/b/c").collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(path_components("a//./b/").collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(path_components("").count(), 0);
        assert_eq!(path_components("/").count(), 0);
    }
}

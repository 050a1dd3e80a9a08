//! In-memory sandbox filesystem
//!
//! Provides an ephemeral, quota-bound tree that exists only in memory.
//! Used by unit tests and by hosts without a browser storage API.

use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use super::backend::{
    path_components, DirEntry, EntryKind, FileStat, QuotaExceeded, SandboxFs, DEFAULT_QUOTA_BYTES,
};

/// In-memory file entry
#[derive(Clone, Debug)]
enum MemoryEntry {
    File(Vec<u8>),
    Directory,
    /// Placeholder for node types that are neither file nor directory
    Special,
}

impl MemoryEntry {
    const fn kind(&self) -> EntryKind {
        match self {
            Self::File(_) => EntryKind::File,
            Self::Directory => EntryKind::Directory,
            Self::Special => EntryKind::Other,
        }
    }

    fn size(&self) -> u64 {
        match self {
            Self::File(data) => data.len() as u64,
            Self::Directory | Self::Special => 0,
        }
    }
}

/// In-memory filesystem backend
///
/// Keys are normalised absolute paths kept in a `BTreeMap`, so directory
/// listings come back in name order.
pub struct MemoryFs {
    entries: RwLock<BTreeMap<String, MemoryEntry>>,
    quota: u64,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create an empty filesystem with the default 1 MiB quota
    pub fn new() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }

    pub fn with_quota(quota: u64) -> Self {
        let mut entries = BTreeMap::new();
        // Root always exists
        entries.insert("/".to_string(), MemoryEntry::Directory);
        Self {
            entries: RwLock::new(entries),
            quota,
        }
    }

    /// Create with initial file contents, adding parent directories as needed
    pub fn with_files(files: &[(&str, &[u8])]) -> Result<Self> {
        let fs = Self::new();
        for (path, content) in files {
            fs.write(path, content)?;
        }
        Ok(fs)
    }

    /// Normalize path (leading /, no trailing /, no empty or `.` parts)
    fn normalize_path(path: &str) -> String {
        let mut normalized = String::new();
        for part in path_components(path) {
            normalized.push('/');
            normalized.push_str(part);
        }
        if normalized.is_empty() {
            normalized.push('/');
        }
        normalized
    }

    fn parent_path(path: &str) -> Option<&str> {
        if path == "/" {
            return None;
        }
        match path.rfind('/')? {
            0 => Some("/"),
            idx => Some(&path[..idx]),
        }
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, MemoryEntry>>> {
        self.entries.read().map_err(|_| anyhow!("Lock poisoned"))
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, MemoryEntry>>> {
        self.entries.write().map_err(|_| anyhow!("Lock poisoned"))
    }

    /// Create every missing ancestor of `path` as a directory
    fn ensure_parents(entries: &mut BTreeMap<String, MemoryEntry>, path: &str) -> Result<()> {
        let mut current = String::new();
        let parts: Vec<&str> = path_components(path).collect();
        for part in &parts[..parts.len().saturating_sub(1)] {
            current = format!("{current}/{part}");
            match entries.entry(current.clone()).or_insert(MemoryEntry::Directory) {
                MemoryEntry::Directory => {}
                _ => bail!("Not a directory: {current}"),
            }
        }
        Ok(())
    }

    /// Bytes currently held by files
    pub fn used_bytes(&self) -> Result<u64> {
        Ok(self.read_lock()?.values().map(MemoryEntry::size).sum())
    }

    /// Write entire file contents (create or overwrite)
    pub fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let path = Self::normalize_path(path);
        let mut entries = self.write_lock()?;

        let previous = match entries.get(&path) {
            Some(MemoryEntry::Directory) => bail!("Is a directory: {path}"),
            Some(MemoryEntry::Special) => bail!("Not a regular file: {path}"),
            Some(entry) => entry.size(),
            None => 0,
        };
        let used: u64 = entries.values().map(MemoryEntry::size).sum();
        let wanted = used - previous + data.len() as u64;
        if wanted > self.quota {
            tracing::warn!(path = %path, wanted, quota = self.quota, "memory fs quota exceeded");
            return Err(QuotaExceeded {
                path,
                wanted,
                quota: self.quota,
            }
            .into());
        }

        Self::ensure_parents(&mut entries, &path)?;
        entries.insert(path, MemoryEntry::File(data.to_vec()));
        Ok(())
    }

    /// Create a directory (parent must exist)
    pub fn create_dir(&self, path: &str) -> Result<()> {
        let path = Self::normalize_path(path);
        let mut entries = self.write_lock()?;
        if let Some(parent) = Self::parent_path(&path) {
            match entries.get(parent) {
                Some(MemoryEntry::Directory) => {}
                Some(_) => bail!("Not a directory: {parent}"),
                None => bail!("Parent directory does not exist: {parent}"),
            }
        }
        if entries.contains_key(&path) {
            bail!("Already exists: {path}");
        }
        entries.insert(path, MemoryEntry::Directory);
        Ok(())
    }

    /// Create a directory and all parent directories
    pub fn create_dir_all(&self, path: &str) -> Result<()> {
        let path = Self::normalize_path(path);
        let mut entries = self.write_lock()?;
        Self::ensure_parents(&mut entries, &path)?;
        match entries.entry(path.clone()).or_insert(MemoryEntry::Directory) {
            MemoryEntry::Directory => Ok(()),
            _ => bail!("Already exists: {path}"),
        }
    }

    /// Create a node that is neither a file nor a directory
    pub fn create_special(&self, path: &str) -> Result<()> {
        let path = Self::normalize_path(path);
        let mut entries = self.write_lock()?;
        Self::ensure_parents(&mut entries, &path)?;
        if entries.contains_key(&path) {
            bail!("Already exists: {path}");
        }
        entries.insert(path, MemoryEntry::Special);
        Ok(())
    }

    /// Remove a file, special node or empty directory
    pub fn remove(&self, path: &str) -> Result<()> {
        let path = Self::normalize_path(path);
        if path == "/" {
            bail!("Cannot remove root");
        }
        let mut entries = self.write_lock()?;
        let prefix = format!("{path}/");
        if entries.range(prefix.clone()..).next().is_some_and(|(key, _)| key.starts_with(&prefix)) {
            bail!("Directory not empty: {path}");
        }
        entries
            .remove(&path)
            .map(|_| ())
            .ok_or_else(|| anyhow!("Not found: {path}"))
    }
}

#[async_trait(?Send)]
impl SandboxFs for MemoryFs {
    async fn stat(&self, path: &str) -> Result<FileStat> {
        let path = Self::normalize_path(path);
        let entries = self.read_lock()?;

        match entries.get(&path) {
            Some(MemoryEntry::File(data)) => Ok(FileStat::file(data.len() as u64)),
            Some(MemoryEntry::Directory) => Ok(FileStat::dir()),
            Some(MemoryEntry::Special) => Ok(FileStat::other()),
            None => bail!("Not found: {path}"),
        }
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let path = Self::normalize_path(path);
        let entries = self.read_lock()?;

        // Verify path is a directory
        match entries.get(&path) {
            Some(MemoryEntry::Directory) => {}
            Some(_) => bail!("Not a directory: {path}"),
            None => bail!("Directory not found: {path}"),
        }

        let prefix = if path == "/" { "/".to_string() } else { format!("{path}/") };
        let children = entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, entry)| {
                let name = &key[prefix.len()..];
                // Only direct children (no / in remainder)
                (!name.is_empty() && !name.contains('/')).then(|| DirEntry::new(name, entry.kind()))
            })
            .collect();
        Ok(children)
    }

    fn quota(&self) -> u64 {
        self.quota
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stat_and_resolve_dir() {
        let fs = MemoryFs::with_files(&[("/docs/readme.txt", b"hello".as_slice())]).unwrap();

        let stat = fs.stat("/docs/readme.txt").await.unwrap();
        assert!(stat.is_file);
        assert_eq!(stat.size, 5);

        assert!(fs.stat("docs").await.unwrap().is_dir);
        assert!(fs.resolve_dir("/docs/").await.is_ok());
        assert!(fs.resolve_dir("").await.is_ok());
        assert!(fs.resolve_dir("/docs/readme.txt").await.is_err());
        assert!(fs.resolve_dir("/missing").await.is_err());
    }

    #[tokio::test]
    async fn test_read_dir_lists_direct_children_in_order() {
        let fs = MemoryFs::new();
        fs.create_dir("/top").unwrap();
        fs.write("/top/b.txt", b"B").unwrap();
        fs.create_dir_all("/top/a/nested").unwrap();
        fs.create_special("/top/pipe").unwrap();
        fs.write("/topsy", b"not a child").unwrap();

        let entries = fs.read_dir("/top").await.unwrap();
        assert_eq!(
            entries,
            vec![
                DirEntry::new("a", EntryKind::Directory),
                DirEntry::new("b.txt", EntryKind::File),
                DirEntry::new("pipe", EntryKind::Other),
            ]
        );

        let root = fs.read_dir("/").await.unwrap();
        assert_eq!(
            root.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            ["top", "topsy"]
        );
    }

    #[tokio::test]
    async fn test_read_dir_errors() {
        let fs = MemoryFs::with_files(&[("/file", b"x".as_slice())]).unwrap();
        assert!(fs.read_dir("/file").await.is_err());
        assert!(fs.read_dir("/nope").await.is_err());
    }

    #[tokio::test]
    async fn test_quota_is_enforced() {
        let fs = MemoryFs::with_quota(8);
        fs.write("/a", b"12345").unwrap();
        let err = fs.write("/b", b"1234").unwrap_err();
        assert_eq!(
            err.downcast_ref::<QuotaExceeded>(),
            Some(&QuotaExceeded {
                path: "/b".into(),
                wanted: 9,
                quota: 8,
            })
        );
        assert!(fs.stat("/b").await.is_err());
        // Overwriting releases the old size first
        fs.write("/a", b"12345678").unwrap();
        assert_eq!(fs.used_bytes().unwrap(), 8);
        assert_eq!(fs.quota(), 8);
    }

    #[test]
    fn test_create_and_remove() {
        let fs = MemoryFs::new();
        assert!(fs.create_dir("/a/b").is_err());
        fs.create_dir("/a").unwrap();
        assert!(fs.create_dir("/a").is_err());
        fs.write("/a/f", b"").unwrap();
        assert!(fs.remove("/a").is_err());
        fs.remove("/a/f").unwrap();
        fs.remove("/a").unwrap();
        assert!(fs.remove("/a").is_err());
        assert!(fs.remove("/").is_err());
        assert!(fs.write("/", b"x").is_err());
    }

    #[tokio::test]
    async fn test_write_does_not_replace_special_nodes() {
        let fs = MemoryFs::new();
        fs.create_special("/dev/tty").unwrap();

        assert!(fs.write("/dev/tty", b"text").is_err());
        assert_eq!(fs.stat("/dev/tty").await.unwrap(), FileStat::other());
        assert_eq!(fs.used_bytes().unwrap(), 0);
    }
}

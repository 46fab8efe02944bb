//! File store trait definitions.
//!
//! Every builtin and the engine itself go through this capability; the
//! `resolve_secure` choke point is the only way a user-supplied path is
//! ever turned into a host path.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::Result;

/// Async sandboxed file store.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// The sandbox root on the host filesystem.
    fn root(&self) -> &Path;

    /// Map (virtual cwd, user input) to a contained host path.
    ///
    /// Fails with [`Error::Sandbox`](crate::Error::Sandbox) if the result
    /// would lie outside the root.
    fn resolve_secure(&self, cwd: &str, input: &str) -> Result<PathBuf>;

    /// Re-virtualize a successfully resolved host path.
    ///
    /// This is the only way a virtual working directory is ever assigned.
    fn virtual_path(&self, host: &Path) -> Result<String>;

    /// Read directory entries.
    async fn list(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Create a file or update its timestamp.
    async fn touch(&self, path: &Path) -> Result<()>;

    /// Create a directory.
    async fn mkdir(&self, path: &Path, recursive: bool) -> Result<()>;

    /// Remove a file or directory.
    async fn remove(&self, path: &Path, recursive: bool) -> Result<()>;

    /// Copy a file or, recursively, a directory.
    async fn copy(&self, src: &Path, dst: &Path, recursive: bool) -> Result<()>;

    /// Move or rename a file or directory.
    async fn rename(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Get file metadata.
    async fn stat(&self, path: &Path) -> Result<StatInfo>;

    /// Check whether a path exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Read a file's contents as text.
    async fn read_file(&self, path: &Path) -> Result<String>;

    /// Write or append contents to a file, creating parents as needed.
    async fn write_file(&self, path: &Path, data: &str, append: bool) -> Result<()>;
}

/// Directory entry.
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Entry name (not full path).
    pub name: String,
    /// True for directories.
    pub is_dir: bool,
    /// Size in bytes; zero for directories.
    pub size: u64,
}

/// File metadata.
#[derive(Debug, Clone)]
pub struct StatInfo {
    /// Base name of the path.
    pub name: String,
    /// True for directories.
    pub is_dir: bool,
    /// Size in bytes; zero for directories.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

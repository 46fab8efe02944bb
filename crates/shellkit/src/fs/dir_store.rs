//! Directory-backed sandbox file store.
//!
//! All virtual paths resolve beneath a single host directory; creating
//! that directory at construction time is the only operation allowed to
//! fail fatally.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::resolve;
use super::traits::{DirEntry, FileStore, StatInfo};
use crate::error::{Error, Result};

/// Sandbox file store rooted at a host directory.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }
}

#[async_trait]
impl FileStore for DirStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_secure(&self, cwd: &str, input: &str) -> Result<PathBuf> {
        resolve::resolve_secure(&self.root, cwd, input)
    }

    fn virtual_path(&self, host: &Path) -> Result<String> {
        resolve::virtual_path(&self.root, host)
    }

    async fn list(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(path).await?;
        while let Some(entry) = dir.next_entry().await? {
            let meta = entry.metadata().await?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: meta.is_dir(),
                size: if meta.is_dir() { 0 } else { meta.len() },
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn touch(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(())
    }

    async fn mkdir(&self, path: &Path, recursive: bool) -> Result<()> {
        if recursive {
            tokio::fs::create_dir_all(path).await?;
        } else {
            tokio::fs::create_dir(path).await?;
        }
        Ok(())
    }

    async fn remove(&self, path: &Path, recursive: bool) -> Result<()> {
        let meta = tokio::fs::metadata(path).await?;
        if meta.is_dir() {
            if recursive {
                tokio::fs::remove_dir_all(path).await?;
            } else {
                tokio::fs::remove_dir(path).await?;
            }
        } else {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }

    async fn copy(&self, src: &Path, dst: &Path, recursive: bool) -> Result<()> {
        let meta = tokio::fs::metadata(src).await?;
        if !meta.is_dir() {
            if let Some(parent) = dst.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::copy(src, dst).await?;
            return Ok(());
        }
        if !recursive {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "is a directory (use -r)",
            )));
        }
        // Breadth-first copy; avoids boxed recursion in an async fn.
        let mut queue: Vec<(PathBuf, PathBuf)> = vec![(src.to_path_buf(), dst.to_path_buf())];
        while let Some((from, to)) = queue.pop() {
            tokio::fs::create_dir_all(&to).await?;
            let mut dir = tokio::fs::read_dir(&from).await?;
            while let Some(entry) = dir.next_entry().await? {
                let target = to.join(entry.file_name());
                if entry.metadata().await?.is_dir() {
                    queue.push((entry.path(), target));
                } else {
                    tokio::fs::copy(entry.path(), target).await?;
                }
            }
        }
        Ok(())
    }

    async fn rename(&self, src: &Path, dst: &Path) -> Result<()> {
        tokio::fs::rename(src, dst).await?;
        Ok(())
    }

    async fn stat(&self, path: &Path) -> Result<StatInfo> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(StatInfo {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            is_dir: meta.is_dir(),
            size: if meta.is_dir() { 0 } else { meta.len() },
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        })
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn write_file(&self, path: &Path, data: &str, append: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        if append {
            use tokio::io::AsyncWriteExt;
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            file.write_all(data.as_bytes()).await?;
        } else {
            tokio::fs::write(path, data).await?;
        }
        Ok(())
    }
}

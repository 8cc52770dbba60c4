use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use crate::clipboard::ContentHash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub is_dir: bool,
    pub len: u64,
}

/// Local filesystem operations used while syncing.
#[async_trait]
pub trait LocalFilesPort: Send + Sync {
    /// `Ok(None)` when the path does not exist.
    async fn metadata(&self, path: &Path) -> Result<Option<FileMeta>>;
    /// Fingerprint of the file contents, read in chunks.
    async fn hash_file(&self, path: &Path) -> Result<ContentHash>;

    /// Write into the client's scratch directory and return the full path.
    async fn write_scratch(&self, name: &str, bytes: &[u8]) -> Result<PathBuf>;
    async fn write_to(&self, dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf>;
    async fn remove(&self, path: &Path) -> Result<()>;
}

//! Local filesystem adapter backed by `tokio::fs`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use cy_core::ports::{FileMeta, LocalFilesPort};
use cy_core::ContentHash;

const HASH_CHUNK: usize = 64 * 1024;
const FALLBACK_NAME: &str = "downloaded_file";

pub struct TokioLocalFiles {
    scratch_dir: PathBuf,
}

impl TokioLocalFiles {
    pub fn new(scratch_dir: PathBuf) -> Self {
        Self { scratch_dir }
    }

    /// `<temp>/crossyclip`
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("crossyclip"))
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }
}

#[async_trait]
impl LocalFilesPort for TokioLocalFiles {
    async fn metadata(&self, path: &Path) -> Result<Option<FileMeta>> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(Some(FileMeta {
                is_dir: meta.is_dir(),
                len: meta.len(),
            })),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to stat {}", path.display())),
        }
    }

    async fn hash_file(&self, path: &Path) -> Result<ContentHash> {
        let mut file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("failed to open {}", path.display()))?;

        let mut hasher = ContentHash::streaming();
        let mut buf = vec![0u8; HASH_CHUNK];
        loop {
            let read = file.read(&mut buf).await?;
            if read == 0 {
                break;
            }
            hasher.update(&buf[..read]);
        }
        Ok(hasher.finish())
    }

    async fn write_scratch(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.write_to(&self.scratch_dir, name, bytes).await
    }

    async fn write_to(&self, dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let path = dir.join(safe_file_name(name));
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}

/// Server-supplied names must not escape the target directory.
fn safe_file_name(name: &str) -> String {
    name.rsplit(|c| c == '/' || c == '\\')
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .unwrap_or(FALLBACK_NAME)
        .to_string()
}

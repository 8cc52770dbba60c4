use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::remote::RemoteClipboardEntry;
use crate::sync::SyncError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with status {status}")]
    Server { status: u16 },

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("unexpected server payload: {0}")]
    Protocol(String),

    #[error("local file error: {0}")]
    Io(String),
}

impl From<TransportError> for SyncError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(msg) => SyncError::Network(msg),
            TransportError::Server { status } => SyncError::Server { status },
            TransportError::FileNotFound(path) => SyncError::FileNotFound(path),
            TransportError::Protocol(msg) => SyncError::Protocol(msg),
            TransportError::Io(msg) => SyncError::Io(msg),
        }
    }
}

/// HTTP side of the cloud clipboard service. No call is retried here.
#[async_trait]
pub trait ClipboardTransportPort: Send + Sync {
    async fn upload_text(&self, text: &str) -> Result<(), TransportError>;
    /// Streams the file; it is never buffered whole in memory.
    async fn upload_file(&self, path: &Path) -> Result<(), TransportError>;
    /// `Ok(None)` when the service has nothing stored yet.
    async fn fetch_latest(&self) -> Result<Option<RemoteClipboardEntry>, TransportError>;
}

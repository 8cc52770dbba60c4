use std::path::PathBuf;

use thiserror::Error;

use crate::clipboard::PayloadKind;

/// Failures a sync operation can end with.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with status {status}")]
    Server { status: u16 },

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    OversizedPayload { size: u64, limit: u64 },

    #[error("another sync operation is in progress")]
    LockBusy,

    #[error("unexpected server payload: {0}")]
    Protocol(String),

    #[error("clipboard access failed: {0}")]
    Clipboard(String),

    #[error("local file operation failed: {0}")]
    Io(String),

    #[error("no app key configured")]
    MissingCredentials,

    #[error("cloud clipboard is empty")]
    NothingToDownload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Automatic sync is off or credentials are missing.
    Disabled,
    Debounced,
    LockBusy,
    NoChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Oversized { path: PathBuf, size: u64, limit: u64 },
    Directory(PathBuf),
}

/// Result of one pass through either sync direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Uploaded(PayloadKind),
    Downloaded(PayloadKind),
    /// Content already in sync, nothing transferred.
    Unchanged,
    Skipped(SkipReason),
    Rejected(RejectReason),
    Failed(SyncError),
}

impl SyncOutcome {
    pub fn is_transfer(&self) -> bool {
        matches!(self, SyncOutcome::Uploaded(_) | SyncOutcome::Downloaded(_))
    }
}

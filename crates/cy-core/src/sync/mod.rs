//! Sync domain models and state machine.

pub mod download_memory;
pub mod error;
pub mod event;
pub mod lock;
pub mod snapshot;
pub mod state;

pub use download_memory::DownloadMemory;
pub use error::{RejectReason, SkipReason, SyncError, SyncOutcome};
pub use event::SyncEvent;
pub use lock::{LockAttempt, SyncLock};
pub use snapshot::{ChangeKind, ChangeSet, ClipboardSnapshot};
pub use state::{LastOperation, LocalIdentity, OperationKind, SyncState};

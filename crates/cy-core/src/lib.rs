//! # cy-core
//!
//! Core domain models and sync rules for CrossyClip.
//!
//! This crate contains pure business logic without any infrastructure dependencies.
//! Time is always passed in as milliseconds so every rule here can be tested
//! without a runtime.

// Public module exports
pub mod clipboard;
pub mod config;
pub mod decision;
pub mod ports;
pub mod remote;
pub mod retry;
pub mod sync;

// Re-export commonly used types at the crate root
pub use clipboard::{
    ClipboardFingerprints, ClipboardPayload, ContentHash, ContentHasher, HashAlgorithm,
    LocalClipboardState, PayloadKind,
};
pub use config::ClientConfig;
pub use decision::{DownloadDecision, UploadDecision};
pub use remote::{RemoteClipboardEntry, RemoteContent};
pub use retry::RetryPolicy;
pub use sync::{
    ClipboardSnapshot, DownloadMemory, LockAttempt, SyncError, SyncEvent, SyncLock, SyncState,
};

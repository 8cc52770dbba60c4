//! CrossyClip application orchestration layer.
//!
//! The sync engine and the runtime loop that feeds it triggers.

pub mod deps;
pub mod engine;
pub mod gate;
pub mod runtime;

pub use deps::SyncDeps;
pub use engine::{LocalTrigger, RemoteTrigger, SyncEngine};
pub use gate::{ProcessingGate, ProcessingGuard};
pub use runtime::{SyncCommand, SyncRuntime, SyncRuntimeHandle};

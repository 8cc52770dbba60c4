//! Boundaries the sync engine talks through. Adapters live in `cy-infra`
//! and `cy-platform`; tests substitute in-memory fakes.

mod clipboard;
mod clock;
mod events;
mod files;
mod push;
mod transport;

pub use clipboard::SystemClipboardPort;
pub use clock::ClockPort;
pub use events::SyncEventPort;
pub use files::{FileMeta, LocalFilesPort};
pub use push::{PushChannelPort, PushEvent, PushSubscription};
pub use transport::{ClipboardTransportPort, TransportError};

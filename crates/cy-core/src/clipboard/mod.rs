//! Clipboard domain models.
mod hash;
mod payload;
mod state;

pub use hash::{ContentHash, ContentHasher, HashAlgorithm};
pub use payload::{ClipboardPayload, PayloadKind};
pub use state::{ClipboardFingerprints, LocalClipboardState};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::ContentHash;

/// The three logical kinds the clipboard can hold, in selection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    File,
    Image,
    Text,
}

impl PayloadKind {
    /// File > Image > Text
    pub const PRIORITY: [PayloadKind; 3] =
        [PayloadKind::File, PayloadKind::Image, PayloadKind::Text];

    pub fn as_str(self) -> &'static str {
        match self {
            PayloadKind::File => "file",
            PayloadKind::Image => "image",
            PayloadKind::Text => "text",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical clipboard item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardPayload {
    Text(String),
    Image(Vec<u8>),
    FileRef {
        path: PathBuf,
        size: u64,
        hash: ContentHash,
    },
}

impl ClipboardPayload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            ClipboardPayload::Text(_) => PayloadKind::Text,
            ClipboardPayload::Image(_) => PayloadKind::Image,
            ClipboardPayload::FileRef { .. } => PayloadKind::File,
        }
    }

    /// Fingerprint over the payload's raw bytes. Text is hashed as UTF-8.
    pub fn fingerprint(&self) -> ContentHash {
        match self {
            ClipboardPayload::Text(text) => ContentHash::of(text.as_bytes()),
            ClipboardPayload::Image(bytes) => ContentHash::of(bytes),
            ClipboardPayload::FileRef { hash, .. } => hash.clone(),
        }
    }
}

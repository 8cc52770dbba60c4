//! The cloud's "latest" clipboard item, as fetched by the transport.

use chrono::{DateTime, Utc};

use crate::clipboard::{ContentHash, PayloadKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteContent {
    Text(String),
    Image {
        bytes: Vec<u8>,
        mime: Option<String>,
    },
    File {
        name: String,
        bytes: Vec<u8>,
        mime: Option<String>,
    },
}

impl RemoteContent {
    pub fn kind(&self) -> PayloadKind {
        match self {
            RemoteContent::Text(_) => PayloadKind::Text,
            RemoteContent::Image { .. } => PayloadKind::Image,
            RemoteContent::File { .. } => PayloadKind::File,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            RemoteContent::Text(text) => text.as_bytes(),
            RemoteContent::Image { bytes, .. } | RemoteContent::File { bytes, .. } => bytes,
        }
    }
}

/// Owned by the service; the client only ever sees the newest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteClipboardEntry {
    pub content: RemoteContent,
    /// Informational only. Change detection compares fingerprints.
    pub timestamp: Option<DateTime<Utc>>,
}

impl RemoteClipboardEntry {
    pub fn new(content: RemoteContent, timestamp: Option<DateTime<Utc>>) -> Self {
        Self { content, timestamp }
    }

    pub fn kind(&self) -> PayloadKind {
        self.content.kind()
    }

    /// Same hashing rules as local payloads, so a file uploaded from here
    /// and fetched back compares equal.
    pub fn fingerprint(&self) -> ContentHash {
        ContentHash::of(self.content.bytes())
    }

    pub fn is_empty(&self) -> bool {
        self.content.bytes().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardPayload;

    #[test]
    fn remote_text_matches_local_text_fingerprint() {
        let remote = RemoteClipboardEntry::new(RemoteContent::Text("hello".into()), None);
        let local = ClipboardPayload::Text("hello".into());
        assert_eq!(remote.fingerprint(), local.fingerprint());
        assert_eq!(remote.kind(), PayloadKind::Text);
    }

    #[test]
    fn file_fingerprint_covers_bytes_not_name() {
        let a = RemoteClipboardEntry::new(
            RemoteContent::File {
                name: "a.txt".into(),
                bytes: b"same".to_vec(),
                mime: None,
            },
            None,
        );
        let b = RemoteClipboardEntry::new(
            RemoteContent::File {
                name: "b.txt".into(),
                bytes: b"same".to_vec(),
                mime: Some("text/plain".into()),
            },
            None,
        );
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}

use std::path::PathBuf;

use super::{ContentHash, PayloadKind};

/// What the OS clipboard currently exposes, one slot per payload kind.
///
/// Empty strings and empty images are normalised to `None` by [`LocalClipboardState::new`],
/// so "present" always means "has something worth syncing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalClipboardState {
    pub file: Option<PathBuf>,
    pub image: Option<Vec<u8>>,
    pub text: Option<String>,
}

impl LocalClipboardState {
    pub fn new(file: Option<PathBuf>, image: Option<Vec<u8>>, text: Option<String>) -> Self {
        Self {
            file: file.filter(|p| !p.as_os_str().is_empty()),
            image: image.filter(|b| !b.is_empty()),
            text: text.filter(|t| !t.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.image.is_none() && self.text.is_none()
    }

    /// Kinds present on the clipboard, highest priority first.
    pub fn formats(&self) -> Vec<PayloadKind> {
        PayloadKind::PRIORITY
            .into_iter()
            .filter(|kind| match kind {
                PayloadKind::File => self.file.is_some(),
                PayloadKind::Image => self.image.is_some(),
                PayloadKind::Text => self.text.is_some(),
            })
            .collect()
    }

    /// Cheap identity of this state for change detection.
    ///
    /// File references are identified by their path, not their content, so a
    /// large file on the clipboard is not re-read on every poll.
    pub fn fingerprints(&self) -> ClipboardFingerprints {
        ClipboardFingerprints {
            file: self
                .file
                .as_ref()
                .map(|p| ContentHash::of(p.to_string_lossy().as_bytes())),
            image: self.image.as_deref().map(ContentHash::of),
            text: self.text.as_deref().map(|t| ContentHash::of(t.as_bytes())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardFingerprints {
    pub file: Option<ContentHash>,
    pub image: Option<ContentHash>,
    pub text: Option<ContentHash>,
}

impl ClipboardFingerprints {
    pub fn get(&self, kind: PayloadKind) -> Option<&ContentHash> {
        match kind {
            PayloadKind::File => self.file.as_ref(),
            PayloadKind::Image => self.image.as_ref(),
            PayloadKind::Text => self.text.as_ref(),
        }
    }
}

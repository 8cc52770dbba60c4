use std::path::{Path, PathBuf};

use crate::clipboard::{ContentHash, PayloadKind};

/// Identity of the content most recently pulled from the cloud.
///
/// Breaks the echo loop: a download writes to the local clipboard, the poll loop
/// sees the change, and without this check the same content would go straight
/// back up. The clipboard holds one logical item, so recording one kind clears
/// the other two.
#[derive(Debug, Clone, Default)]
pub struct DownloadMemory {
    text: Option<ContentHash>,
    image: Option<ContentHash>,
    file: Option<ContentHash>,
    file_path: Option<PathBuf>,
    recorded_at_ms: i64,
}

impl DownloadMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_download(
        &mut self,
        kind: PayloadKind,
        fingerprint: ContentHash,
        path: Option<PathBuf>,
        now_ms: i64,
    ) {
        self.text = None;
        self.image = None;
        self.file = None;
        self.file_path = None;

        match kind {
            PayloadKind::Text => self.text = Some(fingerprint),
            PayloadKind::Image => self.image = Some(fingerprint),
            PayloadKind::File => {
                self.file = Some(fingerprint);
                self.file_path = path;
            }
        }
        self.recorded_at_ms = now_ms;
    }

    /// Compares against the stored fingerprint for `kind` only. Nothing stored
    /// never matches.
    pub fn was_just_downloaded(&self, kind: PayloadKind, fingerprint: &ContentHash) -> bool {
        self.fingerprint(kind)
            .is_some_and(|stored| stored == fingerprint)
    }

    pub fn fingerprint(&self, kind: PayloadKind) -> Option<&ContentHash> {
        match kind {
            PayloadKind::Text => self.text.as_ref(),
            PayloadKind::Image => self.image.as_ref(),
            PayloadKind::File => self.file.as_ref(),
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn recorded_at_ms(&self) -> i64 {
        self.recorded_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_memory_never_matches() {
        let memory = DownloadMemory::new();
        assert!(!memory.was_just_downloaded(PayloadKind::Text, &ContentHash::of(b"")));
        assert!(!memory.was_just_downloaded(PayloadKind::Image, &ContentHash::of(b"")));
        assert!(!memory.was_just_downloaded(PayloadKind::File, &ContentHash::of(b"")));
    }

    #[test]
    fn recorded_kind_matches_only_itself() {
        let mut memory = DownloadMemory::new();
        let hash = ContentHash::of(b"hello");
        memory.record_download(PayloadKind::Text, hash.clone(), None, 42);

        assert!(memory.was_just_downloaded(PayloadKind::Text, &hash));
        assert!(!memory.was_just_downloaded(PayloadKind::Image, &hash));
        assert!(!memory.was_just_downloaded(PayloadKind::Text, &ContentHash::of(b"other")));
        assert_eq!(memory.recorded_at_ms(), 42);
    }

    #[test]
    fn recording_another_kind_clears_the_rest() {
        let mut memory = DownloadMemory::new();
        let text = ContentHash::of(b"hello");
        let file = ContentHash::of(b"file bytes");
        memory.record_download(PayloadKind::Text, text.clone(), None, 1);
        memory.record_download(
            PayloadKind::File,
            file.clone(),
            Some(PathBuf::from("/tmp/report.pdf")),
            2,
        );

        assert!(!memory.was_just_downloaded(PayloadKind::Text, &text));
        assert!(memory.was_just_downloaded(PayloadKind::File, &file));
        assert_eq!(memory.file_path(), Some(Path::new("/tmp/report.pdf")));

        memory.record_download(PayloadKind::Image, ContentHash::of(b"png"), None, 3);
        assert!(memory.file_path().is_none());
        assert!(memory.fingerprint(PayloadKind::File).is_none());
    }
}

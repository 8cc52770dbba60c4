use crate::clipboard::{ContentHash, PayloadKind};

use super::download_memory::DownloadMemory;
use super::snapshot::ClipboardSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Upload,
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastOperation {
    pub kind: OperationKind,
    pub at_ms: i64,
}

/// Identity of the last item this client uploaded, while the cloud still
/// holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    pub kind: PayloadKind,
    pub fingerprint: ContentHash,
}

impl LocalIdentity {
    pub fn matches(&self, kind: PayloadKind, fingerprint: &ContentHash) -> bool {
        self.kind == kind && &self.fingerprint == fingerprint
    }
}

/// Mutable bookkeeping shared by both sync directions.
///
/// Owned by the engine; callers take short-lived locks around reads and
/// writes and never hold it across network I/O.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    pub snapshot: ClipboardSnapshot,
    pub downloads: DownloadMemory,
    pub last_operation: Option<LastOperation>,
    pub last_local: Option<LocalIdentity>,
    /// 最近一次上传或下载后云端内容的指纹
    pub cloud_fingerprint: Option<ContentHash>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the last operation finished less than `window_ms` ago.
    pub fn is_debounced(&self, now_ms: i64, window_ms: i64) -> bool {
        self.last_operation
            .is_some_and(|op| now_ms.saturating_sub(op.at_ms) < window_ms)
    }

    pub fn record_upload(&mut self, kind: PayloadKind, fingerprint: ContentHash, now_ms: i64) {
        self.last_local = Some(LocalIdentity {
            kind,
            fingerprint: fingerprint.clone(),
        });
        self.cloud_fingerprint = Some(fingerprint);
        self.last_operation = Some(LastOperation {
            kind: OperationKind::Upload,
            at_ms: now_ms,
        });
    }

    /// `local` is what the clipboard holds after the write, which can differ
    /// from the cloud bytes when the platform re-encodes images.
    ///
    /// The cloud has moved past our last upload, so copying that item again
    /// is a fresh change.
    pub fn record_download(
        &mut self,
        kind: PayloadKind,
        local: ContentHash,
        cloud: ContentHash,
        path: Option<std::path::PathBuf>,
        now_ms: i64,
    ) {
        self.downloads.record_download(kind, local, path, now_ms);
        self.last_local = None;
        self.cloud_fingerprint = Some(cloud);
        self.last_operation = Some(LastOperation {
            kind: OperationKind::Download,
            at_ms: now_ms,
        });
    }

    /// Already uploaded by us, or just written here by a download.
    pub fn is_known_locally(&self, kind: PayloadKind, fingerprint: &ContentHash) -> bool {
        self.last_local
            .as_ref()
            .is_some_and(|local| local.matches(kind, fingerprint))
            || self.downloads.was_just_downloaded(kind, fingerprint)
    }
}

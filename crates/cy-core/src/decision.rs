use crate::clipboard::{ContentHash, PayloadKind};
use crate::sync::SyncState;

/// 本地剪贴板内容是否需要上传
///
/// 注意：
/// - 不包含 IO / async
/// - 时间由调用方传入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadDecision {
    Upload,
    /// Same item this client uploaded last.
    AlreadyUploaded,
    /// Content was just written here by a download; uploading it would echo.
    JustDownloaded,
}

impl UploadDecision {
    /// A forced (user-initiated) upload ignores the last-uploaded identity but
    /// still refuses to echo a download.
    pub fn evaluate(
        state: &SyncState,
        kind: PayloadKind,
        fingerprint: &ContentHash,
        force: bool,
    ) -> Self {
        if state.downloads.was_just_downloaded(kind, fingerprint) {
            return UploadDecision::JustDownloaded;
        }
        if !force
            && state
                .last_local
                .as_ref()
                .is_some_and(|local| local.matches(kind, fingerprint))
        {
            return UploadDecision::AlreadyUploaded;
        }
        UploadDecision::Upload
    }

    pub fn should_upload(self) -> bool {
        self == UploadDecision::Upload
    }
}

/// 云端内容是否需要写入本地剪贴板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadDecision {
    Apply,
    /// Cloud fingerprint has not moved since our last transfer.
    CloudUnchanged,
    /// Local clipboard already holds this content.
    AlreadyLocal,
}

impl DownloadDecision {
    /// `local` is the clipboard's current fingerprint of the same kind. The
    /// doorbell for our own upload is covered by `cloud_fingerprint`.
    pub fn evaluate(
        state: &SyncState,
        remote: &ContentHash,
        local: Option<&ContentHash>,
        force: bool,
    ) -> Self {
        if !force && state.cloud_fingerprint.as_ref() == Some(remote) {
            return DownloadDecision::CloudUnchanged;
        }
        if local == Some(remote) {
            return DownloadDecision::AlreadyLocal;
        }
        DownloadDecision::Apply
    }
}

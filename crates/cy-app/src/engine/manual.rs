use std::path::{Path, PathBuf};

use tracing::{info, info_span, Instrument};

use cy_core::sync::{SkipReason, SyncError, SyncEvent, SyncOutcome};
use cy_core::RemoteContent;

use super::{io_error, SyncEngine};

impl SyncEngine {
    /// Upload a file the user picked, regardless of what the clipboard holds.
    pub async fn upload_file(&self, path: &Path) -> SyncOutcome {
        let span = info_span!("usecase.sync.upload_file", path = %path.display());
        async move {
            let _guard = match self.admit(true).await {
                Ok(guard) => guard,
                Err(reason) => return SyncOutcome::Skipped(reason),
            };

            match self.upload_file_reference(path, true).await {
                Ok(outcome) => outcome,
                Err(err) => self.fail(err),
            }
        }
        .instrument(span)
        .await
    }

    /// Save the latest cloud item into `dir` without touching the clipboard.
    /// Text is written as `clipboard.txt`.
    pub async fn save_latest(&self, dir: &Path) -> Result<PathBuf, SyncError> {
        let span = info_span!("usecase.sync.save_latest", dir = %dir.display());
        async move {
            let _guard = match self.admit(true).await {
                Ok(guard) => guard,
                Err(SkipReason::Disabled) => return Err(SyncError::MissingCredentials),
                Err(_) => return Err(SyncError::LockBusy),
            };

            let saved = self.save_latest_into(dir).await;
            match &saved {
                Ok(path) => {
                    info!(path = %path.display(), "Saved cloud clipboard content");
                    self.events.emit(SyncEvent::Notice {
                        title: "Saved".to_string(),
                        message: path.display().to_string(),
                    });
                }
                Err(err) => {
                    self.fail(err.clone());
                }
            }
            saved
        }
        .instrument(span)
        .await
    }

    async fn save_latest_into(&self, dir: &Path) -> Result<PathBuf, SyncError> {
        let entry = self
            .transport
            .fetch_latest()
            .await?
            .ok_or(SyncError::NothingToDownload)?;

        let (name, bytes) = match &entry.content {
            RemoteContent::Text(text) => ("clipboard.txt".to_string(), text.as_bytes()),
            RemoteContent::Image { bytes, mime } => (
                format!(
                    "clipboard-{}.{}",
                    self.clock.now_ms(),
                    image_extension(mime.as_deref())
                ),
                bytes.as_slice(),
            ),
            RemoteContent::File { name, bytes, .. } => (name.clone(), bytes.as_slice()),
        };

        self.files
            .write_to(dir, &name, bytes)
            .await
            .map_err(io_error)
    }
}

fn image_extension(mime: Option<&str>) -> &'static str {
    match mime.map(|m| m.trim().to_ascii_lowercase()).as_deref() {
        Some("image/jpeg") | Some("image/jpg") => "jpg",
        Some("image/gif") => "gif",
        Some("image/webp") => "webp",
        Some("image/bmp") => "bmp",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::image_extension;

    #[test]
    fn image_extension_follows_mime() {
        assert_eq!(image_extension(Some("image/jpeg")), "jpg");
        assert_eq!(image_extension(Some(" IMAGE/WEBP ")), "webp");
        assert_eq!(image_extension(None), "png");
        assert_eq!(image_extension(Some("application/octet-stream")), "png");
    }
}

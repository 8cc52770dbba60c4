use std::path::PathBuf;

use tracing::{debug, info, info_span, Instrument};

use cy_core::sync::{SyncError, SyncEvent, SyncOutcome};
use cy_core::{ContentHash, DownloadDecision, PayloadKind, RemoteContent};

use super::{clipboard_error, io_error, RemoteTrigger, SyncEngine};

impl SyncEngine {
    /// Remote-change path: fetch the latest cloud item and apply it locally
    /// when it differs from what this client already has.
    pub async fn handle_remote_change(&self, trigger: RemoteTrigger) -> SyncOutcome {
        let span = info_span!("usecase.sync.remote_change", trigger = ?trigger);
        async move {
            let force = trigger == RemoteTrigger::Manual;
            let _guard = match self.admit(force).await {
                Ok(guard) => guard,
                Err(reason) => {
                    debug!(reason = ?reason, "Skipping remote sync cycle");
                    return SyncOutcome::Skipped(reason);
                }
            };

            match self.download_latest(force).await {
                Ok(outcome) => outcome,
                Err(err) => self.fail(err),
            }
        }
        .instrument(span)
        .await
    }

    async fn download_latest(&self, force: bool) -> Result<SyncOutcome, SyncError> {
        let Some(entry) = self.transport.fetch_latest().await? else {
            debug!("Cloud clipboard is empty");
            return Ok(SyncOutcome::Unchanged);
        };
        if entry.is_empty() {
            debug!(kind = %entry.kind(), "Cloud entry has no content");
            return Ok(SyncOutcome::Unchanged);
        }

        let kind = entry.kind();
        let remote = entry.fingerprint();
        let local = self.local_fingerprint(kind).await;

        {
            let mut state = self.state.lock().await;
            match DownloadDecision::evaluate(&state, &remote, local.as_ref(), force) {
                DownloadDecision::Apply => {}
                DownloadDecision::CloudUnchanged => {
                    debug!(kind = %kind, fingerprint = %remote.short(), "Cloud unchanged");
                    return Ok(SyncOutcome::Unchanged);
                }
                DownloadDecision::AlreadyLocal => {
                    debug!(
                        kind = %kind,
                        fingerprint = %remote.short(),
                        "Cloud content already local"
                    );
                    state.cloud_fingerprint = Some(remote);
                    return Ok(SyncOutcome::Unchanged);
                }
            }
        }

        let (written, path) = self.write_to_clipboard(&entry.content, &remote).await?;

        let now = self.clock.now_ms();
        self.state
            .lock()
            .await
            .record_download(kind, written, remote.clone(), path, now);

        info!(kind = %kind, fingerprint = %remote.short(), "Applied cloud clipboard content");
        self.events.emit(SyncEvent::ContentSynced { kind });
        Ok(SyncOutcome::Downloaded(kind))
    }

    /// Content fingerprint of the clipboard's `kind` slot, comparable with a
    /// cloud entry. Files are hashed by content here, not by path.
    async fn local_fingerprint(&self, kind: PayloadKind) -> Option<ContentHash> {
        let state = self.clipboard.read_state().ok()?;
        match kind {
            PayloadKind::File => {
                let path = state.file?;
                match self.files.hash_file(&path).await {
                    Ok(hash) => Some(hash),
                    Err(err) => {
                        debug!(path = %path.display(), error = %err, "Cannot hash local file");
                        None
                    }
                }
            }
            _ => state.fingerprints().get(kind).cloned(),
        }
    }

    /// Returns the fingerprint of what the clipboard now holds and, for files,
    /// where the bytes were written.
    async fn write_to_clipboard(
        &self,
        content: &RemoteContent,
        remote: &ContentHash,
    ) -> Result<(ContentHash, Option<PathBuf>), SyncError> {
        match content {
            RemoteContent::Text(text) => {
                self.clipboard.write_text(text).map_err(clipboard_error)?;
                Ok((remote.clone(), None))
            }
            RemoteContent::Image { bytes, .. } => {
                self.clipboard.write_image(bytes).map_err(clipboard_error)?;
                // The platform re-encodes images; remember what a poll will read back.
                let written = match self.clipboard.read_image() {
                    Ok(Some(png)) => ContentHash::of(&png),
                    _ => remote.clone(),
                };
                Ok((written, None))
            }
            RemoteContent::File { name, bytes, .. } => {
                let path = self
                    .files
                    .write_scratch(name, bytes)
                    .await
                    .map_err(io_error)?;
                self.clipboard
                    .write_file_reference(&path)
                    .map_err(clipboard_error)?;
                Ok((remote.clone(), Some(path)))
            }
        }
    }
}

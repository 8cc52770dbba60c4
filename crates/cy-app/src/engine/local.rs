use std::path::Path;

use tracing::{debug, info, info_span, warn, Instrument};

use cy_core::sync::{RejectReason, SkipReason, SyncError, SyncEvent, SyncOutcome};
use cy_core::{ContentHash, LocalClipboardState, PayloadKind, UploadDecision};

use super::{io_error, LocalTrigger, SyncEngine};

const BYTES_PER_MB: u64 = 1024 * 1024;

impl SyncEngine {
    pub async fn poll_local(&self) -> SyncOutcome {
        self.handle_local_change(LocalTrigger::Poll).await
    }

    /// Local-change path: detect, pick the highest-priority payload, upload.
    pub async fn handle_local_change(&self, trigger: LocalTrigger) -> SyncOutcome {
        let span = info_span!("usecase.sync.local_change", trigger = ?trigger);
        async move {
            let force = trigger == LocalTrigger::Manual;
            let _guard = match self.admit(force).await {
                Ok(guard) => guard,
                Err(reason) => {
                    debug!(reason = ?reason, "Skipping local sync cycle");
                    return SyncOutcome::Skipped(reason);
                }
            };

            let current = match self.read_clipboard() {
                Ok(current) => current,
                Err(err) => return self.fail(err),
            };

            let previous = {
                let mut state = self.state.lock().await;
                let previous = state.snapshot.last().clone();
                let fingerprints = current.fingerprints();
                if trigger == LocalTrigger::Poll {
                    match state.snapshot.diff(&fingerprints) {
                        None => return SyncOutcome::Skipped(SkipReason::NoChange),
                        Some(change) if change.is_removal_only() => {
                            debug!("Clipboard cleared, nothing to upload");
                            return SyncOutcome::Skipped(SkipReason::NoChange);
                        }
                        Some(change) => {
                            debug!(primary = ?change.primary(), "Local clipboard changed");
                        }
                    }
                } else {
                    state.snapshot.overwrite(fingerprints);
                }
                previous
            };

            match self.upload_current(current, force).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    // Forget this change so the next poll tick retries it.
                    self.state.lock().await.snapshot.overwrite(previous);
                    self.fail(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// File > Image > Text; the first kind present is the only one considered.
    async fn upload_current(
        &self,
        current: LocalClipboardState,
        force: bool,
    ) -> Result<SyncOutcome, SyncError> {
        if let Some(path) = current.file {
            return self.upload_file_reference(&path, force).await;
        }
        if let Some(png) = current.image {
            return self.upload_image(png, force).await;
        }
        if let Some(text) = current.text {
            return self.upload_text(text, force).await;
        }
        debug!("Clipboard holds no supported format");
        Ok(SyncOutcome::Skipped(SkipReason::NoChange))
    }

    pub(super) async fn upload_file_reference(
        &self,
        path: &Path,
        force: bool,
    ) -> Result<SyncOutcome, SyncError> {
        let meta = self
            .files
            .metadata(path)
            .await
            .map_err(io_error)?
            .ok_or_else(|| SyncError::FileNotFound(path.to_path_buf()))?;

        if meta.is_dir {
            info!(path = %path.display(), "Refusing to sync a directory");
            self.notice(
                "Folder not supported",
                format!("{} is a folder and cannot be synced", path.display()),
            );
            return Ok(SyncOutcome::Rejected(RejectReason::Directory(
                path.to_path_buf(),
            )));
        }

        let limit = self.config.max_file_size_bytes();
        if meta.len > limit {
            warn!(
                path = %path.display(),
                size = meta.len,
                limit,
                "File exceeds upload limit"
            );
            self.notice(
                "File too large",
                format!(
                    "{} is {} MB; files over {} MB are not synced",
                    display_name(path),
                    meta.len / BYTES_PER_MB,
                    self.config.max_file_size_mb
                ),
            );
            return Ok(SyncOutcome::Rejected(RejectReason::Oversized {
                path: path.to_path_buf(),
                size: meta.len,
                limit,
            }));
        }

        let fingerprint = self.files.hash_file(path).await.map_err(io_error)?;
        if !self.should_upload(PayloadKind::File, &fingerprint, force).await {
            return Ok(SyncOutcome::Unchanged);
        }

        self.transport.upload_file(path).await?;
        Ok(self.finish_upload(PayloadKind::File, fingerprint).await)
    }

    async fn upload_image(&self, png: Vec<u8>, force: bool) -> Result<SyncOutcome, SyncError> {
        let fingerprint = ContentHash::of(&png);
        if !self.should_upload(PayloadKind::Image, &fingerprint, force).await {
            return Ok(SyncOutcome::Unchanged);
        }

        let name = format!("clipboard-{}.png", self.clock.now_ms());
        let scratch = self
            .files
            .write_scratch(&name, &png)
            .await
            .map_err(io_error)?;

        let uploaded = self.transport.upload_file(&scratch).await;
        if let Err(err) = self.files.remove(&scratch).await {
            warn!(path = %scratch.display(), error = %err, "Failed to remove scratch image");
        }
        uploaded?;

        Ok(self.finish_upload(PayloadKind::Image, fingerprint).await)
    }

    async fn upload_text(&self, text: String, force: bool) -> Result<SyncOutcome, SyncError> {
        let fingerprint = ContentHash::of(text.as_bytes());
        if !self.should_upload(PayloadKind::Text, &fingerprint, force).await {
            return Ok(SyncOutcome::Unchanged);
        }

        self.transport.upload_text(&text).await?;
        Ok(self.finish_upload(PayloadKind::Text, fingerprint).await)
    }

    async fn should_upload(
        &self,
        kind: PayloadKind,
        fingerprint: &ContentHash,
        force: bool,
    ) -> bool {
        let state = self.state.lock().await;
        let decision = UploadDecision::evaluate(&state, kind, fingerprint, force);
        if !decision.should_upload() {
            debug!(
                kind = %kind,
                fingerprint = %fingerprint.short(),
                decision = ?decision,
                "Skipping upload"
            );
        }
        decision.should_upload()
    }

    async fn finish_upload(&self, kind: PayloadKind, fingerprint: ContentHash) -> SyncOutcome {
        let now = self.clock.now_ms();
        self.state
            .lock()
            .await
            .record_upload(kind, fingerprint.clone(), now);

        info!(kind = %kind, fingerprint = %fingerprint.short(), "Uploaded clipboard content");
        self.events.emit(SyncEvent::TriggerRefresh);
        SyncOutcome::Uploaded(kind)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! # Sync engine / 同步引擎
//!
//! Both sync directions funnel through one [`ProcessingGate`]; whichever side
//! enters first wins the round and the other is skipped. Nothing is queued.
//! A skipped cycle is re-evaluated on its next trigger against the current
//! clipboard and cloud state.

mod local;
mod manual;
mod remote;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::error;

use cy_core::config::{ClientConfig, SyncConfig};
use cy_core::ports::{
    ClipboardTransportPort, ClockPort, LocalFilesPort, PushChannelPort, SyncEventPort,
    SystemClipboardPort,
};
use cy_core::sync::{SkipReason, SyncError, SyncEvent, SyncOutcome, SyncState};
use cy_core::LocalClipboardState;

use crate::deps::SyncDeps;
use crate::gate::{ProcessingGate, ProcessingGuard};

/// What caused a local-change pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTrigger {
    /// Poll tick; only acts when the snapshot reports a change.
    Poll,
    /// Window regained focus; re-checks the current clipboard.
    Focus,
    /// User asked for an upload; bypasses debounce and the last-upload check.
    Manual,
}

/// What caused a remote-change pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteTrigger {
    Notification,
    PeriodicCheck,
    /// User asked for a download; bypasses debounce and the cloud-unchanged check.
    Manual,
}

pub struct SyncEngine {
    clipboard: Arc<dyn SystemClipboardPort>,
    files: Arc<dyn LocalFilesPort>,
    transport: Arc<dyn ClipboardTransportPort>,
    push: Arc<dyn PushChannelPort>,
    clock: Arc<dyn ClockPort>,
    events: Arc<dyn SyncEventPort>,

    config: SyncConfig,
    has_credentials: bool,
    gate: ProcessingGate,
    state: Mutex<SyncState>,
}

impl SyncEngine {
    pub fn new(deps: SyncDeps, config: &ClientConfig) -> Self {
        let gate = ProcessingGate::new(config.sync.lock_timeout_ms, deps.clock.clone());
        Self {
            clipboard: deps.clipboard,
            files: deps.files,
            transport: deps.transport,
            push: deps.push,
            clock: deps.clock,
            events: deps.events,
            config: config.sync.clone(),
            has_credentials: config.has_credentials(),
            gate,
            state: Mutex::new(SyncState::new()),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn push_channel(&self) -> Arc<dyn PushChannelPort> {
        self.push.clone()
    }

    pub(crate) fn events(&self) -> Arc<dyn SyncEventPort> {
        self.events.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.gate.is_processing()
    }

    /// Record the current clipboard as already seen so content present at
    /// startup is not uploaded by the first poll.
    pub async fn prime_snapshot(&self) {
        match self.clipboard.read_state() {
            Ok(current) => {
                self.state
                    .lock()
                    .await
                    .snapshot
                    .overwrite(current.fingerprints());
            }
            Err(err) => error!(error = %err, "Failed to read clipboard while priming snapshot"),
        }
    }

    /// Shared preamble of every automatic pass: credentials, debounce, gate.
    async fn admit(&self, bypass_debounce: bool) -> Result<ProcessingGuard, SkipReason> {
        if !self.has_credentials {
            return Err(SkipReason::Disabled);
        }

        if !bypass_debounce {
            let now = self.clock.now_ms();
            let window = i64::try_from(self.config.debounce_ms).unwrap_or(i64::MAX);
            if self.state.lock().await.is_debounced(now, window) {
                return Err(SkipReason::Debounced);
            }
        }

        self.gate.try_enter().ok_or(SkipReason::LockBusy)
    }

    fn read_clipboard(&self) -> Result<LocalClipboardState, SyncError> {
        self.clipboard
            .read_state()
            .map_err(|err| SyncError::Clipboard(format!("{err:#}")))
    }

    /// Log, surface to the UI, swallow.
    fn fail(&self, err: SyncError) -> SyncOutcome {
        error!(error = %err, "Sync cycle failed");
        self.events.emit(SyncEvent::SyncError {
            message: err.to_string(),
        });
        SyncOutcome::Failed(err)
    }

    fn notice(&self, title: &str, message: String) {
        self.events.emit(SyncEvent::Notice {
            title: title.to_string(),
            message,
        });
    }
}

fn io_error(err: anyhow::Error) -> SyncError {
    SyncError::Io(format!("{err:#}"))
}

fn clipboard_error(err: anyhow::Error) -> SyncError {
    SyncError::Clipboard(format!("{err:#}"))
}

//! Builds the adapter graph and hands it to [`SyncEngine`].

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use cy_app::{SyncDeps, SyncEngine};
use cy_core::config::ClientConfig;
use cy_core::ports::SystemClipboardPort;
use cy_infra::push::PushSettings;
use cy_infra::{
    BroadcastSyncEvents, ReqwestClipboardTransport, SocketIoPushChannel, SystemClock,
    TokioLocalFiles,
};

const EVENT_CAPACITY: usize = 64;

pub struct Wiring {
    pub engine: Arc<SyncEngine>,
    pub events: Arc<BroadcastSyncEvents>,
}

/// The OS clipboard for the current platform.
#[cfg(any(target_os = "macos", target_os = "windows", target_os = "linux"))]
pub fn system_clipboard() -> anyhow::Result<Arc<dyn SystemClipboardPort>> {
    let clipboard =
        cy_platform::LocalClipboard::new().context("Failed to open the system clipboard")?;
    Ok(Arc::new(clipboard))
}

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
pub fn system_clipboard() -> anyhow::Result<Arc<dyn SystemClipboardPort>> {
    anyhow::bail!("clipboard access is not supported on this platform")
}

pub fn wire_engine(
    config: &ClientConfig,
    clipboard: Arc<dyn SystemClipboardPort>,
) -> anyhow::Result<Wiring> {
    let transport = ReqwestClipboardTransport::new(&config.account, config.sync.request_timeout())
        .context("Failed to build cloud transport")?;
    let push = SocketIoPushChannel::new(&config.account, PushSettings::from_config(&config.push))
        .context("Failed to build push channel")?;
    let files = TokioLocalFiles::in_temp_dir();
    let events = Arc::new(BroadcastSyncEvents::new(EVENT_CAPACITY));

    info!(
        api = %config.account.api_base_url,
        push = %push.endpoint(),
        scratch = %files.scratch_dir().display(),
        "Wiring sync engine"
    );

    let deps = SyncDeps {
        clipboard,
        files: Arc::new(files),
        transport: Arc::new(transport),
        push: Arc::new(push),
        clock: Arc::new(SystemClock),
        events: events.clone(),
    };

    Ok(Wiring {
        engine: Arc::new(SyncEngine::new(deps, config)),
        events,
    })
}

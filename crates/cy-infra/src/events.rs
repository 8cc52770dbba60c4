use tokio::sync::broadcast;
use tracing::debug;

use cy_core::ports::SyncEventPort;
use cy_core::sync::SyncEvent;

/// Fans sync events out to any number of listeners. Events emitted while no
/// one is subscribed are dropped.
pub struct BroadcastSyncEvents {
    tx: broadcast::Sender<SyncEvent>,
}

impl BroadcastSyncEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }
}

impl SyncEventPort for BroadcastSyncEvents {
    fn emit(&self, event: SyncEvent) {
        debug!(event = ?event, "Emitting sync event");
        let _ = self.tx.send(event);
    }
}

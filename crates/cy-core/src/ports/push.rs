use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// Signals from the push channel. None of them carries clipboard data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    Connected,
    /// Doorbell: the cloud has new content, go fetch it.
    ClipboardUpdated,
    Disconnected { reason: String },
    /// Reconnect budget exhausted; the channel has stopped.
    GaveUp { reason: String },
}

/// A live subscription. Dropping it (or calling [`PushSubscription::close`])
/// stops the background connection.
pub struct PushSubscription {
    pub events: mpsc::Receiver<PushEvent>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl PushSubscription {
    pub fn new(events: mpsc::Receiver<PushEvent>, shutdown: oneshot::Sender<()>) -> Self {
        Self {
            events,
            shutdown: Some(shutdown),
        }
    }

    pub fn close(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for PushSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

#[async_trait]
pub trait PushChannelPort: Send + Sync {
    async fn subscribe(&self) -> Result<PushSubscription>;
}

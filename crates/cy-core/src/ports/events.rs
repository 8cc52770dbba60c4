use crate::sync::SyncEvent;

/// Outbound notifications to whatever presents sync status.
pub trait SyncEventPort: Send + Sync {
    fn emit(&self, event: SyncEvent);
}

use serde::Serialize;

use crate::clipboard::PayloadKind;

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    /// Cloud content changed because of this client; views should refresh.
    TriggerRefresh,
    ContentSynced { kind: PayloadKind },
    SyncError { message: String },
    Notice { title: String, message: String },
    ConnectionError { message: String },
}

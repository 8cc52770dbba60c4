//! # Sync dependencies / 同步依赖
//!
//! Parameter grouping for [`crate::SyncEngine`] construction. Not a builder:
//! every port is required and nothing is defaulted.

use std::sync::Arc;

use cy_core::ports::{
    ClipboardTransportPort, ClockPort, LocalFilesPort, PushChannelPort, SyncEventPort,
    SystemClipboardPort,
};

pub struct SyncDeps {
    // Local side / 本地
    pub clipboard: Arc<dyn SystemClipboardPort>,
    pub files: Arc<dyn LocalFilesPort>,

    // Cloud side / 云端
    pub transport: Arc<dyn ClipboardTransportPort>,
    pub push: Arc<dyn PushChannelPort>,

    // System / 系统
    pub clock: Arc<dyn ClockPort>,
    pub events: Arc<dyn SyncEventPort>,
}

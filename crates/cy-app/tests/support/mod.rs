#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, Notify};

use cy_app::{SyncDeps, SyncEngine};
use cy_core::config::ClientConfig;
use cy_core::ports::{
    ClipboardTransportPort, ClockPort, FileMeta, LocalFilesPort, PushChannelPort, PushEvent,
    PushSubscription, SyncEventPort, SystemClipboardPort, TransportError,
};
use cy_core::sync::SyncEvent;
use cy_core::{ContentHash, LocalClipboardState, RemoteClipboardEntry, RemoteContent};

pub const START_MS: i64 = 1_700_000_000_000;

#[derive(Default)]
pub struct InMemoryClipboard {
    state: Mutex<LocalClipboardState>,
    writes: AtomicUsize,
    reads: AtomicUsize,
}

impl InMemoryClipboard {
    pub fn set(&self, state: LocalClipboardState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn set_text(&self, text: &str) {
        self.set(LocalClipboardState::new(None, None, Some(text.to_string())));
    }

    pub fn current(&self) -> LocalClipboardState {
        self.state.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl SystemClipboardPort for InMemoryClipboard {
    fn read_file_reference(&self) -> Result<Option<PathBuf>> {
        Ok(self.state.lock().unwrap().file.clone())
    }

    fn read_image(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.state.lock().unwrap().image.clone())
    }

    fn read_text(&self) -> Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().text.clone())
    }

    fn write_text(&self, text: &str) -> Result<()> {
        self.set_text(text);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write_image(&self, png: &[u8]) -> Result<()> {
        self.set(LocalClipboardState::new(None, Some(png.to_vec()), None));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write_file_reference(&self, path: &Path) -> Result<()> {
        self.set(LocalClipboardState::new(
            Some(path.to_path_buf()),
            None,
            Some(path.display().to_string()),
        ));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Uploaded {
    Text(String),
    File(PathBuf),
}

/// Cloud stand-in. Text uploads become the latest entry; uploads and fetches
/// can be held open to simulate a slow network.
#[derive(Default)]
pub struct FakeCloud {
    latest: Mutex<Option<RemoteClipboardEntry>>,
    uploads: Mutex<Vec<Uploaded>>,
    fetches: AtomicUsize,
    fail_next_upload: AtomicBool,
    pub block_uploads: AtomicBool,
    pub block_fetches: AtomicBool,
    pub entered: Notify,
    pub release: Notify,
}

impl FakeCloud {
    pub fn set_latest(&self, content: RemoteContent) {
        *self.latest.lock().unwrap() = Some(RemoteClipboardEntry::new(content, None));
    }

    pub fn uploads(&self) -> Vec<Uploaded> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.uploads().len() + self.fetches()
    }

    pub fn fail_next_upload(&self) {
        self.fail_next_upload.store(true, Ordering::SeqCst);
    }

    async fn hold_if(&self, flag: &AtomicBool) {
        if flag.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }

    fn check_failure(&self) -> Result<(), TransportError> {
        if self.fail_next_upload.swap(false, Ordering::SeqCst) {
            return Err(TransportError::Network("connection reset".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ClipboardTransportPort for FakeCloud {
    async fn upload_text(&self, text: &str) -> Result<(), TransportError> {
        self.hold_if(&self.block_uploads).await;
        self.check_failure()?;
        self.uploads
            .lock()
            .unwrap()
            .push(Uploaded::Text(text.to_string()));
        self.set_latest(RemoteContent::Text(text.to_string()));
        Ok(())
    }

    async fn upload_file(&self, path: &Path) -> Result<(), TransportError> {
        self.hold_if(&self.block_uploads).await;
        self.check_failure()?;
        self.uploads
            .lock()
            .unwrap()
            .push(Uploaded::File(path.to_path_buf()));
        Ok(())
    }

    async fn fetch_latest(&self) -> Result<Option<RemoteClipboardEntry>, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.hold_if(&self.block_fetches).await;
        Ok(self.latest.lock().unwrap().clone())
    }
}

pub struct FakeFiles {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    meta_overrides: Mutex<HashMap<PathBuf, FileMeta>>,
    removed: Mutex<Vec<PathBuf>>,
    scratch: PathBuf,
}

impl Default for FakeFiles {
    fn default() -> Self {
        Self {
            files: Mutex::default(),
            meta_overrides: Mutex::default(),
            removed: Mutex::default(),
            scratch: PathBuf::from("/scratch"),
        }
    }
}

impl FakeFiles {
    pub fn insert(&self, path: impl Into<PathBuf>, bytes: &[u8]) {
        self.files.lock().unwrap().insert(path.into(), bytes.to_vec());
    }

    pub fn insert_meta(&self, path: impl Into<PathBuf>, meta: FileMeta) {
        self.meta_overrides.lock().unwrap().insert(path.into(), meta);
    }

    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl LocalFilesPort for FakeFiles {
    async fn metadata(&self, path: &Path) -> Result<Option<FileMeta>> {
        if let Some(meta) = self.meta_overrides.lock().unwrap().get(path) {
            return Ok(Some(*meta));
        }
        Ok(self.files.lock().unwrap().get(path).map(|bytes| FileMeta {
            is_dir: false,
            len: bytes.len() as u64,
        }))
    }

    async fn hash_file(&self, path: &Path) -> Result<ContentHash> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|bytes| ContentHash::of(bytes))
            .ok_or_else(|| anyhow!("no such file: {}", path.display()))
    }

    async fn write_scratch(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.scratch.join(name);
        self.insert(path.clone(), bytes);
        Ok(path)
    }

    async fn write_to(&self, dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = dir.join(name);
        self.insert(path.clone(), bytes);
        Ok(path)
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        self.files.lock().unwrap().remove(path);
        self.removed.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

pub struct FakePush {
    subscribes: AtomicUsize,
    sender: Mutex<Option<mpsc::Sender<PushEvent>>>,
    shutdown: Mutex<Option<oneshot::Receiver<()>>>,
}

impl Default for FakePush {
    fn default() -> Self {
        Self {
            subscribes: AtomicUsize::new(0),
            sender: Mutex::new(None),
            shutdown: Mutex::new(None),
        }
    }
}

impl FakePush {
    pub fn subscribes(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    pub async fn push(&self, event: PushEvent) {
        let sender = self.sender.lock().unwrap().clone();
        sender
            .expect("not subscribed")
            .send(event)
            .await
            .expect("subscriber gone");
    }
}

#[async_trait]
impl PushChannelPort for FakePush {
    async fn subscribe(&self) -> Result<PushSubscription> {
        self.subscribes.fetch_add(1, Ordering::SeqCst);
        let (events_tx, events_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        *self.sender.lock().unwrap() = Some(events_tx);
        *self.shutdown.lock().unwrap() = Some(shutdown_rx);
        Ok(PushSubscription::new(events_rx, shutdown_tx))
    }
}

pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn advance_ms(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self(AtomicI64::new(START_MS))
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct RecordingEvents(Mutex<Vec<SyncEvent>>);

impl RecordingEvents {
    pub fn all(&self) -> Vec<SyncEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn has_error(&self) -> bool {
        self.all()
            .iter()
            .any(|e| matches!(e, SyncEvent::SyncError { .. }))
    }
}

impl SyncEventPort for RecordingEvents {
    fn emit(&self, event: SyncEvent) {
        self.0.lock().unwrap().push(event);
    }
}

pub struct Harness {
    pub engine: Arc<SyncEngine>,
    pub clipboard: Arc<InMemoryClipboard>,
    pub cloud: Arc<FakeCloud>,
    pub files: Arc<FakeFiles>,
    pub push: Arc<FakePush>,
    pub clock: Arc<ManualClock>,
    pub events: Arc<RecordingEvents>,
    pub config: ClientConfig,
}

pub fn enabled_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.account.app_key = "test-key".to_string();
    config.sync.automatic_clipboard_sync = true;
    config
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(enabled_config())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_files(config, Arc::new(FakeFiles::default()))
    }

    pub fn with_files(config: ClientConfig, files: Arc<FakeFiles>) -> Self {
        let clipboard = Arc::new(InMemoryClipboard::default());
        let cloud = Arc::new(FakeCloud::default());
        let push = Arc::new(FakePush::default());
        let clock = Arc::new(ManualClock::default());
        let events = Arc::new(RecordingEvents::default());

        let engine = SyncEngine::new(
            SyncDeps {
                clipboard: clipboard.clone(),
                files: files.clone(),
                transport: cloud.clone(),
                push: push.clone(),
                clock: clock.clone(),
                events: events.clone(),
            },
            &config,
        );

        Self {
            engine: Arc::new(engine),
            clipboard,
            cloud,
            files,
            push,
            clock,
            events,
            config,
        }
    }

    /// Step past the debounce window.
    pub fn settle(&self) {
        self.clock.advance_ms(2_000);
    }
}

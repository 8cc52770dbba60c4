mod support;

use std::time::Duration;

use cy_app::{SyncCommand, SyncRuntime};
use cy_core::ports::PushEvent;
use cy_core::sync::SyncEvent;
use cy_core::RemoteContent;

use support::{enabled_config, Harness, Uploaded};

async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

#[tokio::test(start_paused = true)]
async fn disabled_sync_starts_neither_poll_nor_push() {
    let mut config = enabled_config();
    config.sync.automatic_clipboard_sync = false;
    let h = Harness::with_config(config.clone());
    h.clipboard.set_text("should stay local");

    let handle = SyncRuntime::spawn(h.engine.clone(), &config);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(h.push.subscribes(), 0);
    assert_eq!(h.clipboard.reads(), 0);
    assert_eq!(h.cloud.network_calls(), 0);
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn poll_tick_uploads_new_local_content() {
    let h = Harness::new();
    let handle = SyncRuntime::spawn(h.engine.clone(), &h.config);

    assert!(eventually(|| h.push.subscribes() == 1).await);
    h.clipboard.set_text("typed after start");

    assert!(
        eventually(|| h.cloud.uploads() == vec![Uploaded::Text("typed after start".into())])
            .await
    );
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn doorbell_fetches_latest() {
    let h = Harness::new();
    h.cloud.set_latest(RemoteContent::Text("rung".into()));
    let handle = SyncRuntime::spawn(h.engine.clone(), &h.config);
    assert!(eventually(|| h.push.subscribes() == 1).await);

    h.push.push(PushEvent::ClipboardUpdated).await;

    assert!(eventually(|| h.clipboard.current().text.as_deref() == Some("rung")).await);
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn exhausted_push_channel_reports_connection_error() {
    let h = Harness::new();
    let handle = SyncRuntime::spawn(h.engine.clone(), &h.config);
    assert!(eventually(|| h.push.subscribes() == 1).await);

    h.push
        .push(PushEvent::GaveUp {
            reason: "server unreachable".into(),
        })
        .await;

    assert!(
        eventually(|| h.events.all().contains(&SyncEvent::ConnectionError {
            message: "server unreachable".into()
        }))
        .await
    );
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn manual_download_command_works_without_automatic_sync() {
    let mut config = enabled_config();
    config.sync.automatic_clipboard_sync = false;
    let h = Harness::with_config(config.clone());
    h.cloud.set_latest(RemoteContent::Text("on demand".into()));

    let handle = SyncRuntime::spawn(h.engine.clone(), &config);
    handle.send(SyncCommand::ManualDownload).await.unwrap();

    assert!(eventually(|| h.clipboard.current().text.as_deref() == Some("on demand")).await);
    handle.shutdown().await.unwrap();
}

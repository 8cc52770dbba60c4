//! Drives the engine: poll ticks, optional periodic remote checks, push
//! doorbells and UI commands, multiplexed on one `select!` loop.
//!
//! Each trigger runs in its own task so a slow upload never blocks the loop;
//! overlapping triggers are resolved by the engine's gate.

use std::future::pending;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use cy_core::config::ClientConfig;
use cy_core::ports::{PushEvent, PushSubscription, SyncEventPort};
use cy_core::sync::SyncEvent;

use crate::engine::{LocalTrigger, RemoteTrigger, SyncEngine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCommand {
    WindowFocused,
    ManualUpload,
    ManualDownload,
    UploadFile(PathBuf),
    SaveLatest(PathBuf),
    Shutdown,
}

pub struct SyncRuntimeHandle {
    commands: mpsc::Sender<SyncCommand>,
    join: JoinHandle<()>,
}

impl SyncRuntimeHandle {
    pub async fn send(&self, command: SyncCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .context("sync runtime is no longer running")
    }

    pub async fn shutdown(self) -> Result<()> {
        // The loop may already have exited; the join below is what matters.
        let _ = self.commands.send(SyncCommand::Shutdown).await;
        self.join.await.context("sync runtime task failed")
    }
}

pub struct SyncRuntime {
    engine: Arc<SyncEngine>,
    events: Arc<dyn SyncEventPort>,
    command_rx: mpsc::Receiver<SyncCommand>,
    automatic: bool,
    poll_interval: Duration,
    remote_check_interval: Option<Duration>,
}

impl SyncRuntime {
    /// Starts the loop. With automatic sync off or no app key, neither the
    /// poll timer nor the push subscription is started; commands still work.
    pub fn spawn(engine: Arc<SyncEngine>, config: &ClientConfig) -> SyncRuntimeHandle {
        let (commands, command_rx) = mpsc::channel(32);
        let runtime = Self {
            events: engine.events(),
            engine,
            command_rx,
            automatic: config.automatic_sync_active(),
            poll_interval: config.sync.poll_interval().max(Duration::from_millis(1)),
            remote_check_interval: config.sync.remote_check_interval(),
        };
        let join = tokio::spawn(runtime.run());
        SyncRuntimeHandle { commands, join }
    }

    async fn run(mut self) {
        let mut poll = None;
        let mut remote_check = None;
        let mut push = None;

        if self.automatic {
            self.engine.prime_snapshot().await;
            poll = Some(ticker(self.poll_interval));
            remote_check = self.remote_check_interval.map(ticker);
            push = self.subscribe().await;
            info!(
                poll_interval_ms = self.poll_interval.as_millis() as u64,
                push = push.is_some(),
                "Automatic clipboard sync started"
            );
        } else {
            info!("Automatic clipboard sync disabled");
        }

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(SyncCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                _ = tick(&mut poll) => {
                    let engine = self.engine.clone();
                    tokio::spawn(async move {
                        engine.poll_local().await;
                    });
                }
                _ = tick(&mut remote_check) => {
                    self.spawn_remote(RemoteTrigger::PeriodicCheck);
                }
                event = next_push(&mut push) => self.handle_push(event, &mut push),
            }
        }

        info!("Sync runtime stopped");
    }

    async fn subscribe(&self) -> Option<PushSubscription> {
        match self.engine.push_channel().subscribe().await {
            Ok(subscription) => Some(subscription),
            Err(err) => {
                error!(error = %err, "Failed to open push channel");
                self.events.emit(SyncEvent::ConnectionError {
                    message: format!("{err:#}"),
                });
                None
            }
        }
    }

    fn handle_push(&self, event: Option<PushEvent>, push: &mut Option<PushSubscription>) {
        match event {
            Some(PushEvent::ClipboardUpdated) => {
                debug!("Push doorbell received");
                self.spawn_remote(RemoteTrigger::Notification);
            }
            Some(PushEvent::Connected) => info!("Push channel connected"),
            Some(PushEvent::Disconnected { reason }) => {
                warn!(reason = %reason, "Push channel disconnected");
            }
            Some(PushEvent::GaveUp { reason }) => {
                error!(reason = %reason, "Push channel gave up reconnecting");
                self.events
                    .emit(SyncEvent::ConnectionError { message: reason });
                *push = None;
            }
            None => {
                warn!("Push channel closed");
                *push = None;
            }
        }
    }

    fn handle_command(&self, command: SyncCommand) {
        debug!(command = ?command, "Sync command received");
        let engine = self.engine.clone();
        match command {
            SyncCommand::WindowFocused => {
                if !self.automatic {
                    return;
                }
                tokio::spawn(async move {
                    engine.handle_local_change(LocalTrigger::Focus).await;
                });
            }
            SyncCommand::ManualUpload => {
                tokio::spawn(async move {
                    engine.handle_local_change(LocalTrigger::Manual).await;
                });
            }
            SyncCommand::ManualDownload => self.spawn_remote(RemoteTrigger::Manual),
            SyncCommand::UploadFile(path) => {
                tokio::spawn(async move {
                    engine.upload_file(&path).await;
                });
            }
            SyncCommand::SaveLatest(dir) => {
                tokio::spawn(async move {
                    // Failures are already reported through the event port.
                    let _ = engine.save_latest(&dir).await;
                });
            }
            SyncCommand::Shutdown => {}
        }
    }

    fn spawn_remote(&self, trigger: RemoteTrigger) {
        let engine = self.engine.clone();
        tokio::spawn(async move {
            engine.handle_remote_change(trigger).await;
        });
    }
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => pending().await,
    }
}

async fn next_push(push: &mut Option<PushSubscription>) -> Option<PushEvent> {
    match push {
        Some(subscription) => subscription.events.recv().await,
        None => pending().await,
    }
}

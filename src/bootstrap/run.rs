use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use cy_app::{LocalTrigger, RemoteTrigger, SyncEngine, SyncRuntime};
use cy_core::config::ClientConfig;
use cy_core::sync::{SyncEvent, SyncOutcome};

use super::cli::Command;

/// Runs the sync loop until Ctrl-C.
pub async fn run_app(
    engine: Arc<SyncEngine>,
    events: broadcast::Receiver<SyncEvent>,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    if !config.has_credentials() {
        warn!("No app key configured; automatic sync is disabled");
    } else if !config.sync.automatic_clipboard_sync {
        info!("Automatic clipboard sync is off; waiting for manual commands");
    }

    let log_task = tokio::spawn(log_events(events));
    let runtime = SyncRuntime::spawn(engine, config);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Shutting down");

    runtime.shutdown().await?;
    log_task.abort();
    Ok(())
}

/// One manual operation, then exit.
pub async fn run_command(engine: &SyncEngine, command: Command) -> anyhow::Result<()> {
    let outcome = match command {
        Command::Run => return Err(anyhow!("`run` is not a one-shot command")),
        Command::Upload => engine.handle_local_change(LocalTrigger::Manual).await,
        Command::Download => engine.handle_remote_change(RemoteTrigger::Manual).await,
        Command::UploadFile { path } => engine.upload_file(&path).await,
        Command::SaveLatest { dir } => {
            let path = engine.save_latest(&dir).await?;
            println!("{}", path.display());
            return Ok(());
        }
    };

    report(outcome)
}

fn report(outcome: SyncOutcome) -> anyhow::Result<()> {
    match outcome {
        SyncOutcome::Uploaded(kind) => println!("uploaded {}", kind.as_str()),
        SyncOutcome::Downloaded(kind) => println!("downloaded {}", kind.as_str()),
        SyncOutcome::Unchanged => println!("already in sync"),
        SyncOutcome::Skipped(reason) => println!("skipped: {reason:?}"),
        SyncOutcome::Rejected(reason) => println!("rejected: {reason:?}"),
        SyncOutcome::Failed(err) => return Err(err.into()),
    }
    Ok(())
}

async fn log_events(mut events: broadcast::Receiver<SyncEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => log_event(&event),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Sync event log fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn log_event(event: &SyncEvent) {
    match event {
        SyncEvent::TriggerRefresh => debug!("Cloud history changed"),
        SyncEvent::ContentSynced { kind } => {
            info!(kind = kind.as_str(), "Clipboard updated from cloud")
        }
        SyncEvent::Notice { title, message } => info!(%title, %message, "Notice"),
        SyncEvent::SyncError { message } => warn!(%message, "Sync failed"),
        SyncEvent::ConnectionError { message } => warn!(%message, "Push channel unavailable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cy_core::clipboard::PayloadKind;
    use cy_core::sync::{SkipReason, SyncError};

    #[test]
    fn failed_outcome_becomes_error() {
        let err = report(SyncOutcome::Failed(SyncError::Server { status: 500 })).unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn other_outcomes_are_ok() {
        assert!(report(SyncOutcome::Uploaded(PayloadKind::Text)).is_ok());
        assert!(report(SyncOutcome::Skipped(SkipReason::Disabled)).is_ok());
        assert!(report(SyncOutcome::Unchanged).is_ok());
    }
}

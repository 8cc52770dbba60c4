//! Tracing configuration for CrossyClip
//!
//! - stdout `fmt` layer, always
//! - non-blocking daily file under the platform data dir, when it can be created
//! - Sentry, when `SENTRY_DSN` is set
//!
//! `RUST_LOG` overrides the default filter.

use std::{fs, io, path::PathBuf, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static SENTRY_GUARD: OnceLock<sentry::ClientInitGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "crossyclip.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives
///
/// ## Behavior / 行为
/// - **Debug** (debug build or `logging.debug`): debug for our crates
/// - **Otherwise**: info
/// - HTTP and websocket internals stay at info or quieter
fn build_filter_directives(debug: bool) -> Vec<String> {
    let level = if debug { "debug" } else { "info" };
    let mut directives = vec![level.to_string()];
    directives.extend(
        ["cy_core", "cy_app", "cy_infra", "cy_platform", "crossyclip_lib"]
            .iter()
            .map(|krate| format!("{krate}={level}")),
    );
    directives.extend(
        ["hyper=info", "hyper_util=info", "reqwest=info", "tungstenite=info"]
            .iter()
            .map(|d| d.to_string()),
    );
    directives
}

/// Initialize the global subscriber. Call once, before anything logs.
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber(debug_logging: bool) -> anyhow::Result<()> {
    let debug = debug_logging || is_development();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(build_filter_directives(debug).join(","))
    });

    let sentry_layer = if let Ok(dsn) = std::env::var("SENTRY_DSN") {
        let guard = sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: 1.0,
                ..Default::default()
            },
        ));

        if SENTRY_GUARD.set(guard).is_err() {
            eprintln!("Sentry guard already initialized");
        }

        Some(sentry_tracing::layer())
    } else {
        None
    };

    let stdout_writer: BoxMakeWriter = BoxMakeWriter::new(io::stdout);
    let file_writer = match build_file_writer() {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stdout: {err}");
            None
        }
    };

    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    let subscriber = registry()
        .with(env_filter)
        .with(sentry_layer)
        .with(stdout_layer);

    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

pub fn logs_dir() -> anyhow::Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join("crossyclip").join("logs"))
        .ok_or_else(|| anyhow::anyhow!("no local data directory on this platform"))
}

fn build_file_writer() -> anyhow::Result<NonBlocking> {
    let logs_dir = logs_dir()?;
    fs::create_dir_all(&logs_dir)?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_directives() {
        let debug = build_filter_directives(true);
        assert_eq!(debug[0], "debug");
        assert!(debug.contains(&"cy_app=debug".to_string()));
        assert!(debug.contains(&"tungstenite=info".to_string()));

        let quiet = build_filter_directives(false);
        assert_eq!(quiet[0], "info");
        assert!(quiet.contains(&"cy_infra=info".to_string()));
    }

    #[test]
    fn test_filter_directives_parse() {
        let directives = build_filter_directives(false).join(",");
        assert!(tracing_subscriber::EnvFilter::try_new(directives).is_ok());
    }
}

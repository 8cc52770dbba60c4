use clap::Parser;

use crossyclip_lib::bootstrap::{self, tracing::init_tracing_subscriber, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = bootstrap::load_config(cli.config.as_deref())?;
    init_tracing_subscriber(config.logging.debug)?;

    let clipboard = bootstrap::wiring::system_clipboard()?;
    let wiring = bootstrap::wire_engine(&config, clipboard)?;

    match cli.command() {
        Command::Run => {
            let events = wiring.events.subscribe();
            bootstrap::run_app(wiring.engine, events, &config).await
        }
        command => bootstrap::run_command(&wiring.engine, command).await,
    }
}

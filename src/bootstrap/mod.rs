pub mod cli;
pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use cli::{Cli, Command};
pub use config::{default_config_path, load_config};
pub use run::{run_app, run_command};
pub use wiring::{wire_engine, Wiring};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "crossyclip", version, about = "Cloud clipboard sync client")]
pub struct Cli {
    /// Config file (default: <config dir>/crossyclip/config.toml)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Keep syncing until interrupted (default)
    Run,
    /// Upload the current clipboard once
    Upload,
    /// Pull the latest cloud entry into the clipboard
    Download,
    /// Upload a file from disk
    UploadFile { path: PathBuf },
    /// Save the latest cloud entry into a directory
    SaveLatest { dir: PathBuf },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

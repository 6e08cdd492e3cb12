pub mod ask;
pub mod snapshot;
pub mod status;
pub mod teach;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "semgate",
    version,
    about = "Confidence-adaptive semantic gateway: cached, defended, budgeted answers"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Path to a TOML or YAML configuration file
    #[arg(long, global = true, env = "SEMGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process one query through the gateway
    Ask(ask::AskArgs),
    /// Teach the defense store a new attack signature
    Teach(teach::TeachArgs),
    /// Show the effective configuration and persisted store sizes
    Status(status::StatusArgs),
    /// Inspect or clear the snapshot file
    Snapshot(snapshot::SnapshotCommand),
}

/// Loads the effective configuration for a command.
pub fn load_config(global: &GlobalArgs) -> anyhow::Result<config::SemgateConfig> {
    Ok(config::load(global.config.as_deref())?)
}

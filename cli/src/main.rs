use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask(args) => commands::ask::run(&cli.global, args).await,
        Commands::Teach(args) => commands::teach::run(&cli.global, args).await,
        Commands::Status(args) => commands::status::run(&cli.global, args).await,
        Commands::Snapshot(cmd) => commands::snapshot::run(&cli.global, cmd).await,
    }
}

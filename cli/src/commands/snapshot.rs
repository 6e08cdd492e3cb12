use super::GlobalArgs;
use clap::{Args, Subcommand};
use colored::Colorize;
use memory::SnapshotFile;
use std::path::PathBuf;

#[derive(Args)]
pub struct SnapshotCommand {
    /// Snapshot file path; defaults to the configured one
    #[arg(long)]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub action: SnapshotAction,
}

#[derive(Subcommand)]
pub enum SnapshotAction {
    /// Show what the snapshot file contains
    Inspect,
    /// Delete the snapshot file
    Clear,
}

fn resolve_path(global: &GlobalArgs, explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let config = super::load_config(global)?;
    config
        .snapshot
        .path
        .ok_or_else(|| anyhow::anyhow!("no snapshot path configured; pass --path"))
}

pub async fn run(global: &GlobalArgs, cmd: SnapshotCommand) -> anyhow::Result<()> {
    let path = resolve_path(global, cmd.path)?;

    match cmd.action {
        SnapshotAction::Inspect => {
            let snapshot = SnapshotFile::new(&path).load()?;
            match snapshot {
                Some(snapshot) if global.json => println!(
                    "{}",
                    serde_json::json!({
                        "path": path,
                        "cacheEntries": snapshot.cache.len(),
                        "signatures": snapshot.defense.len(),
                    })
                ),
                Some(snapshot) => println!(
                    "{} {} ({} cache entries, {} signatures)",
                    "snapshot".bold(),
                    path.display(),
                    snapshot.cache.len(),
                    snapshot.defense.len()
                ),
                None => println!("no snapshot at {}", path.display()),
            }
        }
        SnapshotAction::Clear => {
            match std::fs::remove_file(&path) {
                Ok(()) => println!("{} {}", "cleared".yellow().bold(), path.display()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    println!("no snapshot at {}", path.display());
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(())
}

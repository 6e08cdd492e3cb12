use super::{GlobalArgs, load_config};
use crate::output;
use clap::Args;
use gateway::Gateway;
use memory::SnapshotFile;
use sg_core::GatewayMode;
use std::str::FromStr;
use tracing::warn;

#[derive(Args)]
pub struct AskArgs {
    /// The query to process
    pub query: String,

    /// Override the configured gateway mode (`single` or `adaptive`)
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<GatewayMode>,
}

fn parse_mode(raw: &str) -> Result<GatewayMode, String> {
    GatewayMode::from_str(raw).map_err(|_| format!("unknown mode {raw:?} (single|adaptive)"))
}

pub async fn run(global: &GlobalArgs, args: AskArgs) -> anyhow::Result<()> {
    let mut config = load_config(global)?;
    if let Some(mode) = args.mode {
        config.generation.mode = mode;
    }

    let gateway = Gateway::from_config(&config).await?;

    // Session persistence: restore prior stores, answer, flush back.
    let snapshot_file = config.snapshot.path.as_ref().map(SnapshotFile::new);
    if let Some(file) = &snapshot_file {
        if let Some(snapshot) = file.load()? {
            gateway.restore(snapshot).await;
        }
    }

    let result = gateway.process(&args.query).await;

    if let Some(file) = &snapshot_file {
        if let Err(err) = file.flush(&gateway.snapshot().await) {
            // Persistence is best effort; the answer still stands.
            warn!(error = %err, "snapshot flush failed");
        }
    }

    output::print_result(&result, global.json)
}

use super::{GlobalArgs, load_config};
use clap::Args;
use colored::Colorize;
use gateway::Gateway;
use memory::SnapshotFile;

#[derive(Args)]
pub struct TeachArgs {
    /// Example text of the adversarial pattern
    pub text: String,

    /// Label for the attack class (e.g. "Prompt Injection")
    #[arg(long, default_value = "Custom")]
    pub label: String,
}

pub async fn run(global: &GlobalArgs, args: TeachArgs) -> anyhow::Result<()> {
    let config = load_config(global)?;
    let gateway = Gateway::from_config(&config).await?;

    let snapshot_file = config.snapshot.path.as_ref().map(SnapshotFile::new);
    if let Some(file) = &snapshot_file {
        if let Some(snapshot) = file.load()? {
            gateway.restore(snapshot).await;
        }
    }

    gateway.teach(&args.text, &args.label).await;

    if let Some(file) = &snapshot_file {
        file.flush(&gateway.snapshot().await)?;
    }

    if global.json {
        println!(
            "{}",
            serde_json::json!({
                "learned": args.label,
                "signatures": gateway.defense_len().await,
            })
        );
    } else {
        println!(
            "{} {} ({} signatures known)",
            "learned".green().bold(),
            args.label,
            gateway.defense_len().await
        );
    }
    Ok(())
}

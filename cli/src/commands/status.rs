use super::{GlobalArgs, load_config};
use clap::Args;
use colored::Colorize;
use memory::SnapshotFile;

#[derive(Args)]
pub struct StatusArgs {}

pub async fn run(global: &GlobalArgs, _args: StatusArgs) -> anyhow::Result<()> {
    let config = load_config(global)?;

    let persisted = match &config.snapshot.path {
        Some(path) => SnapshotFile::new(path).load()?,
        None => None,
    };

    if global.json {
        println!(
            "{}",
            serde_json::json!({
                "mode": config.generation.mode.to_string(),
                "route": config.providers.default_route.to_string(),
                "embeddingProvider": config.providers.embedding_provider.to_string(),
                "cacheThreshold": config.cache.similarity_threshold,
                "cacheCapacity": config.cache.capacity,
                "defenseThreshold": config.defense.similarity_threshold,
                "energyBudget": config.generation.energy_budget,
                "maxAttempts": config.generation.max_attempts,
                "snapshot": config.snapshot.path,
                "persistedCacheEntries": persisted.as_ref().map(|s| s.cache.len()),
                "persistedSignatures": persisted.as_ref().map(|s| s.defense.len()),
            })
        );
        return Ok(());
    }

    println!("{}", "semgate status".bold());
    println!("  mode               {}", config.generation.mode);
    println!("  generation route   {}", config.providers.default_route);
    println!("  embedding provider {}", config.providers.embedding_provider);
    println!(
        "  cache              threshold {:.2}, capacity {}",
        config.cache.similarity_threshold, config.cache.capacity
    );
    println!(
        "  defense            threshold {:.2}, seed builtin: {}",
        config.defense.similarity_threshold, config.defense.seed_builtin
    );
    println!(
        "  generation         budget {:.1}, penalty {:.1}, cap {:?}",
        config.generation.energy_budget,
        config.generation.failure_penalty,
        config.generation.max_attempts
    );
    match (&config.snapshot.path, persisted) {
        (Some(path), Some(snapshot)) => println!(
            "  snapshot           {} ({} cache entries, {} signatures)",
            path.display(),
            snapshot.cache.len(),
            snapshot.defense.len()
        ),
        (Some(path), None) => {
            println!("  snapshot           {} (not written yet)", path.display());
        }
        (None, _) => println!("  snapshot           disabled"),
    }
    Ok(())
}

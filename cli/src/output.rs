//! Terminal and JSON rendering of gateway results.

use colored::Colorize;
use sg_core::GatewayResult;

pub fn print_result(result: &GatewayResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let tag = if result.blocked {
        "BLOCKED".red().bold()
    } else if result.cached {
        "CACHED".green().bold()
    } else if result.reason.is_some() {
        "BEST EFFORT".yellow().bold()
    } else {
        "GENERATED".cyan().bold()
    };

    println!("{tag} {}", result.text);
    if let Some(reason) = &result.reason {
        println!("  {} {}", "reason".dimmed(), reason);
    }
    println!(
        "  {} confidence {:.2} | cost ${:.7} | latency {}",
        "stats".dimmed(),
        result.confidence,
        result.cost,
        result
            .latency
            .map(|latency| format!("{}ms", latency.as_millis()))
            .unwrap_or_else(|| "n/a".to_string()),
    );
    Ok(())
}

//! `targets` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::Target;
use registry::TargetRegistry;

use super::load_config;
use crate::cli::TargetsCommand;

/// Execute a `targets` subcommand
pub fn run_targets(config_path: &Path, command: &TargetsCommand) -> Result<()> {
    let config = load_config(config_path)?;
    let mut registry = TargetRegistry::load(&config);

    match command {
        TargetsCommand::List { json } => {
            if *json {
                let json = serde_json::to_string_pretty(registry.targets())
                    .context("Failed to serialize targets")?;
                println!("{}", json);
            } else {
                print!("{}", format_target_list(registry.targets()));
            }
        }
        TargetsCommand::Add { host } => {
            let target = registry
                .add_host(host)
                .with_context(|| format!("Cannot add host '{host}'"))?;
            println!("Added host: {} -> {}", target.name, target.url);
        }
        TargetsCommand::Remove { index } => match registry.remove_at(*index) {
            Some(removed) => println!("Removed host: {}", removed.name),
            None => anyhow::bail!(
                "Invalid index {index}; {} target(s) configured",
                registry.targets().len()
            ),
        },
    }

    observability::record_target_count(registry.targets().len());
    Ok(())
}

/// `<index>. <name> -> <url>` per line, or a note when empty
fn format_target_list(targets: &[Target]) -> String {
    if targets.is_empty() {
        return "Target list is empty.\n".to_string();
    }

    let mut text = String::from("Targets:\n");
    for (index, target) in targets.iter().enumerate() {
        text.push_str(&format!("{index}. {} -> {}\n", target.name, target.url));
    }
    text
}

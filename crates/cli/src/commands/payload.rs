//! `payload` command implementation.

use std::path::Path;

use anyhow::Result;
use contracts::content_length;
use registry::{extract_payload, TargetRegistry};

use super::load_config;
use crate::cli::PayloadCommand;

/// Preview length for `payload show`
const SHOW_PREVIEW_CHARS: usize = 800;

/// Preview length after `payload set`
const SET_PREVIEW_CHARS: usize = 200;

/// Execute a `payload` subcommand
pub fn run_payload(config_path: &Path, command: &PayloadCommand) -> Result<()> {
    let config = load_config(config_path)?;
    let mut registry = TargetRegistry::load(&config);

    match command {
        PayloadCommand::Show => {
            println!("Default payload (preview):");
            println!("{}", preview(registry.default_payload(), SHOW_PREVIEW_CHARS));
        }
        PayloadCommand::Set { text } => {
            let extracted = extract_payload(&text.join(" "));
            registry.set_default_payload(extracted);
            println!(
                "Default payload updated (content-length {}). Preview:",
                content_length(registry.default_payload())
            );
            println!("{}", preview(registry.default_payload(), SET_PREVIEW_CHARS));
        }
    }

    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

//! Mirror number commands — `prime-numbers mirror`.

use anyhow::Result;
use chrono::{DateTime, Local};
use console::style;
use std::path::Path;

use prime_numbers::inventory::Inventory;
use prime_numbers::inventory::api::EXHAUSTED_MESSAGE;
use prime_numbers::inventory::mint::MintOutcome;

use super::super::MirrorCommands;

pub async fn cmd_mirror(project_dir: &Path, command: MirrorCommands) -> Result<()> {
    match command {
        MirrorCommands::Generate { max_attempts, json } => {
            let mut config = super::load_config(project_dir)?;
            if let Some(attempts) = max_attempts {
                config.toml.mirror.max_attempts = attempts;
            }
            let inventory = Inventory::open(&config)?;
            let outcome = inventory.mint_mirror().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            match outcome {
                MintOutcome::Minted { record } => {
                    if !json {
                        println!("{}", style(&record.mirror_number).bold().cyan());
                    }
                }
                MintOutcome::Exhausted { .. } => anyhow::bail!(EXHAUSTED_MESSAGE),
            }
        }
        MirrorCommands::History { json } => {
            let inventory = super::open_inventory(project_dir)?;
            let history = inventory.mirror_history().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
                return Ok(());
            }
            if history.is_empty() {
                println!("No mirror numbers issued yet.");
                return Ok(());
            }

            println!();
            println!("{:<10} Issued", "Number");
            println!("{:<10} ------", "----------");
            for record in &history {
                println!(
                    "{:<10} {}",
                    record.mirror_number,
                    style(format_timestamp(record.created_at)).dim()
                );
            }
            println!();
            println!("{} mirror number(s) issued", history.len());
            println!();
        }
    }

    Ok(())
}

fn format_timestamp(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(at) => at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => millis.to_string(),
    }
}

//! Recognize command - detect ingredients in a photo

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;

use larder_core::adapters::{MockVision, OpenAiVision};
use larder_core::ports::VisionProvider;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum RecognizeCommands {
    /// Recognize ingredients in an image file
    Image {
        /// Path to the image (jpeg, png, webp)
        file: PathBuf,
        /// Use the offline mock provider instead of the vision API
        #[arg(long)]
        mock: bool,
        /// Add recognized ingredients to the pantry
        #[arg(long)]
        add: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recent recognition passes
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Infer the MIME type from the file extension
fn mime_type_for(path: &Path) -> Result<&'static str> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        Some("png") => Ok("image/png"),
        Some("webp") => Ok("image/webp"),
        other => bail!(
            "unsupported image type '{}' (expected jpg, png, or webp)",
            other.unwrap_or("")
        ),
    }
}

pub fn run(command: RecognizeCommands) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.current_user()?;

    match command {
        RecognizeCommands::Image {
            file,
            mock,
            add,
            json,
        } => {
            let mime_type = mime_type_for(&file)?;
            let image_bytes = std::fs::read(&file)
                .with_context(|| format!("failed to read image {:?}", file))?;

            let provider: Box<dyn VisionProvider> = if mock {
                Box::new(MockVision::new())
            } else {
                Box::new(
                    OpenAiVision::from_settings(&ctx.config.vision)
                        .map_err(|e| anyhow::anyhow!(e.to_string()))?,
                )
            };

            let service = ctx.recognition_service(provider);
            let outcome = service.recognize(user.id, &image_bytes, mime_type)?;

            if outcome.from_cache {
                output::warning(&format!(
                    "Vision request failed ({}); showing the last cached result.",
                    outcome.fallback_reason.as_deref().unwrap_or("unknown")
                ));
            }

            let added = if add {
                Some(ctx.pantry_service.add_recognized(user.id, &outcome.items)?)
            } else {
                None
            };

            if json {
                let mut value = serde_json::to_value(&outcome)?;
                if let Some(n) = added {
                    value["added_to_pantry"] = serde_json::json!(n);
                }
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            if outcome.items.is_empty() {
                println!("No ingredients recognized.");
                return Ok(());
            }

            println!("{}", "Recognized ingredients".bold());
            let mut table = output::create_table();
            table.set_header(vec!["Name", "Qty", "Confidence"]);
            for item in &outcome.items {
                table.add_row(vec![
                    item.name.clone(),
                    item.quantity
                        .map(|q| format!("{}", q))
                        .unwrap_or_else(|| "-".to_string()),
                    item.confidence
                        .map(|c| format!("{:.0}%", c * 100.0))
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            }
            println!("{}", table);

            match added {
                Some(n) => output::success(&format!("Added {} items to the pantry", n)),
                None => println!("Run again with --add to stock these in your pantry."),
            }
        }
        RecognizeCommands::History { limit, json } => {
            let service = ctx.recognition_service(Box::new(MockVision::new()));
            let logs = service.history(user.id, limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&logs)?);
                return Ok(());
            }

            if logs.is_empty() {
                println!("No recognition passes yet.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["When", "Items"]);
            for log in &logs {
                table.add_row(vec![
                    log.recognized_at.format("%Y-%m-%d %H:%M").to_string(),
                    log.items_count.to_string(),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

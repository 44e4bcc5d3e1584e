//! Pantry commands - list, add, update, remove, alerts

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use uuid::Uuid;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum PantryCommands {
    /// List pantry items
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an item (accumulates quantity if the item already exists)
    Add {
        /// Item name
        name: String,
        /// Quantity
        #[arg(short, long, default_value = "1")]
        quantity: i64,
        /// Unit (pcs, bag, carton, ...)
        #[arg(short, long, default_value = "pcs")]
        unit: String,
        /// Expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expires: Option<String>,
    },
    /// Update an item's fields
    Update {
        /// Item ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New quantity
        #[arg(short, long)]
        quantity: Option<i64>,
        /// New unit
        #[arg(short, long)]
        unit: Option<String>,
        /// New expiry date (YYYY-MM-DD), or "none" to clear
        #[arg(short, long)]
        expires: Option<String>,
    },
    /// Remove an item
    Remove {
        /// Item ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Show items expiring soon
    Alerts {
        /// Window in days (defaults to the configured alert window)
        #[arg(long)]
        days: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_expiry(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

fn parse_item_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).with_context(|| format!("invalid item id '{}'", s))
}

pub fn run(command: PantryCommands) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.current_user()?;

    match command {
        PantryCommands::List { json } => {
            let items = ctx.pantry_service.list(user.id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }

            if items.is_empty() {
                println!("Pantry is empty. Add items with 'larder pantry add'.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Qty", "Unit", "Expires"]);
            for item in &items {
                table.add_row(vec![
                    item.id.to_string(),
                    item.name.clone(),
                    item.quantity.to_string(),
                    item.unit.clone(),
                    output::format_date(item.expiry_date),
                ]);
            }
            println!("{}", table);
        }
        PantryCommands::Add {
            name,
            quantity,
            unit,
            expires,
        } => {
            let expiry = expires.as_deref().map(parse_expiry).transpose()?;
            let item = ctx
                .pantry_service
                .add(user.id, &name, quantity, &unit, expiry)?;
            output::success(&format!(
                "Added '{}' ({} {})",
                item.name, item.quantity, item.unit
            ));
        }
        PantryCommands::Update {
            id,
            name,
            quantity,
            unit,
            expires,
        } => {
            let item_id = parse_item_id(&id)?;
            let existing = ctx
                .pantry_service
                .list(user.id)?
                .into_iter()
                .find(|i| i.id == item_id)
                .context("pantry item not found")?;

            let expiry = match expires.as_deref() {
                Some("none") => None,
                Some(s) => Some(parse_expiry(s)?),
                None => existing.expiry_date,
            };

            let updated = ctx.pantry_service.update(
                user.id,
                item_id,
                name.as_deref().unwrap_or(&existing.name),
                quantity.unwrap_or(existing.quantity),
                unit.as_deref().unwrap_or(&existing.unit),
                expiry,
            )?;
            output::success(&format!(
                "Updated '{}' ({} {})",
                updated.name, updated.quantity, updated.unit
            ));
        }
        PantryCommands::Remove { id, force } => {
            let item_id = parse_item_id(&id)?;

            if !force
                && !Confirm::new()
                    .with_prompt("Remove this pantry item?")
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }

            ctx.pantry_service.remove(user.id, item_id)?;
            output::success("Item removed");
        }
        PantryCommands::Alerts { days, json } => {
            let window = days.unwrap_or(ctx.config.alert_window_days);
            let items = ctx.pantry_service.expiry_alerts(user.id, window)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }

            if items.is_empty() {
                println!("Nothing expires in the next {} days.", window);
                return Ok(());
            }

            println!(
                "{}",
                format!("Expiring within {} days", window).yellow().bold()
            );
            let mut table = output::create_table();
            table.set_header(vec!["Name", "Qty", "Unit", "Expires"]);
            for item in &items {
                table.add_row(vec![
                    item.name.clone(),
                    item.quantity.to_string(),
                    item.unit.clone(),
                    output::format_date(item.expiry_date),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

//! Cook commands - log cooking and view history

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::Subcommand;
use colored::Colorize;
use uuid::Uuid;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum CookCommands {
    /// Record that you cooked a recipe
    Log {
        /// Recipe ID
        recipe_id: String,
        /// Date cooked (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show cooking history for a date range
    History {
        /// Start date (YYYY-MM-DD, defaults to 30 days ago)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn run(command: CookCommands) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.current_user()?;

    match command {
        CookCommands::Log { recipe_id, date } => {
            let recipe_id = Uuid::parse_str(&recipe_id)
                .with_context(|| format!("invalid recipe id '{}'", recipe_id))?;
            let cooked_on = match date.as_deref() {
                Some(s) => parse_date(s)?,
                None => Utc::now().date_naive(),
            };

            let recipe = ctx.recipe_service.get(recipe_id)?;
            ctx.cooking_service.log(user.id, recipe_id, cooked_on)?;
            output::success(&format!("Logged '{}' on {}", recipe.title, cooked_on));
        }
        CookCommands::History { from, to, json } => {
            let end = match to.as_deref() {
                Some(s) => parse_date(s)?,
                None => Utc::now().date_naive(),
            };
            let start = match from.as_deref() {
                Some(s) => parse_date(s)?,
                None => end - Duration::days(30),
            };

            let history = ctx.cooking_service.history(user.id, start, end)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
                return Ok(());
            }

            if history.is_empty() {
                println!("No cooking logged between {} and {}.", start, end);
                return Ok(());
            }

            println!(
                "{}",
                format!("Cooking history {} to {}", start, end).bold()
            );
            let mut table = output::create_table();
            table.set_header(vec!["Date", "Recipe"]);
            for entry in &history {
                table.add_row(vec![
                    entry.cooked_on.to_string(),
                    entry.recipe_title.clone(),
                ]);
            }
            println!("{}", table);

            let distinct = ctx.cooking_service.distinct_recipes_cooked(user.id)?;
            println!();
            println!("Distinct recipes cooked (all time): {}", distinct);
        }
    }

    Ok(())
}

//! Status command - show activity summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    match ctx.current_user() {
        Ok(user) => {
            let status = ctx.status_service.get_status(
                user.id,
                &user.username,
                ctx.config.alert_window_days,
            )?;

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
                return Ok(());
            }

            println!("{}", format!("Larder Status - {}", status.username).bold());
            if ctx.config.demo_mode {
                output::warning("(demo mode)");
            }
            println!();

            let mut table = output::create_table();
            table.add_row(vec!["Pantry items", &status.pantry_items.to_string()]);
            table.add_row(vec!["Expiring soon", &status.expiring_soon.to_string()]);
            table.add_row(vec!["Recipes", &status.recipes.to_string()]);
            table.add_row(vec!["Cooking logs", &status.cooking_logs.to_string()]);
            table.add_row(vec![
                "Distinct recipes cooked",
                &status.distinct_recipes_cooked.to_string(),
            ]);
            table.add_row(vec![
                "Recognition passes",
                &status.recognition_passes.to_string(),
            ]);
            println!("{}", table);
            println!();
            println!("Database: {}", ctx.repository.db_path().display());
        }
        Err(_) => {
            let status = ctx.status_service.get_anonymous_status()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
                return Ok(());
            }

            println!("{}", "Larder Status".bold());
            println!();
            println!("Not logged in. Run 'larder register' or 'larder login'.");
            println!("  Users: {}", status.users);
            println!("  Recipes: {}", status.recipes);
            println!("  Database: {}", ctx.repository.db_path().display());
        }
    }

    Ok(())
}

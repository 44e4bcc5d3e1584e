//! Recipe commands - list, show, search, match against pantry

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use uuid::Uuid;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// List all recipes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with steps and ingredients
    Show {
        /// Recipe ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search recipes by keyword in title or description
    Search {
        /// Keyword
        keyword: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank recipes against your pantry
    Match {
        /// Show only the top N recipes
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_recipe_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).with_context(|| format!("invalid recipe id '{}'", s))
}

fn print_recipe_table(recipes: &[larder_core::Recipe]) {
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Title", "Description", "kcal"]);
    for recipe in recipes {
        table.add_row(vec![
            recipe.id.to_string(),
            recipe.title.clone(),
            recipe.description.clone(),
            format!("{:.0}", recipe.nutrition.calories),
        ]);
    }
    println!("{}", table);
}

pub fn run(command: RecipeCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        RecipeCommands::List { json } => {
            let recipes = ctx.recipe_service.list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&recipes)?);
                return Ok(());
            }

            if recipes.is_empty() {
                println!("No recipes yet. Enable demo mode to load the sample catalog.");
                return Ok(());
            }
            print_recipe_table(&recipes);
        }
        RecipeCommands::Show { id, json } => {
            let recipe = ctx.recipe_service.get(parse_recipe_id(&id)?)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&recipe)?);
                return Ok(());
            }

            println!("{}", recipe.title.bold());
            println!("{}", recipe.description);
            println!();

            println!("{}", "Ingredients".bold());
            for ing in &recipe.ingredients {
                let amount = match (ing.quantity, ing.unit.as_deref()) {
                    (Some(q), Some(u)) => format!(" ({} {})", q, u),
                    (Some(q), None) => format!(" ({})", q),
                    _ => String::new(),
                };
                let marker = match ing.role {
                    larder_core::domain::IngredientRole::Required => "*",
                    larder_core::domain::IngredientRole::Optional => " ",
                };
                println!("  {} {}{}", marker, ing.name, amount);
            }
            println!("  (* = required)");
            println!();

            println!("{}", "Steps".bold());
            for (i, step) in recipe.steps.iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            println!();

            let n = &recipe.nutrition;
            println!("{}", "Nutrition per serving".bold());
            println!("  Calories: {:.0} kcal", n.calories);
            if let Some(p) = n.protein_g {
                println!("  Protein: {:.0} g", p);
            }
            if let Some(f) = n.fat_g {
                println!("  Fat: {:.0} g", f);
            }
            if let Some(c) = n.carbs_g {
                println!("  Carbs: {:.0} g", c);
            }
            if let Some(s) = n.sodium_mg {
                println!("  Sodium: {:.0} mg", s);
            }
        }
        RecipeCommands::Search { keyword, json } => {
            let recipes = ctx.recipe_service.search(&keyword)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&recipes)?);
                return Ok(());
            }

            if recipes.is_empty() {
                println!("No recipes match '{}'.", keyword);
                return Ok(());
            }
            print_recipe_table(&recipes);
        }
        RecipeCommands::Match { limit, json } => {
            let user = ctx.current_user()?;
            let ranked = ctx.recipe_service.rank_for_pantry(user.id)?;
            let top: Vec<_> = ranked.into_iter().take(limit).collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&top)?);
                return Ok(());
            }

            if top.is_empty() {
                println!("No recipes to rank.");
                return Ok(());
            }

            println!("{}", "Best matches for your pantry".bold());
            let mut table = output::create_table();
            table.set_header(vec!["Grade", "Score", "Match", "Title", "Missing"]);
            for entry in &top {
                let grade = match entry.score.grade {
                    'A' => entry.score.grade.to_string().green().to_string(),
                    'B' => entry.score.grade.to_string().cyan().to_string(),
                    'C' => entry.score.grade.to_string().yellow().to_string(),
                    _ => entry.score.grade.to_string().red().to_string(),
                };
                table.add_row(vec![
                    grade,
                    format!("{:.0}", entry.score.total),
                    format!("{:.0}%", entry.score.match_rate * 100.0),
                    entry.recipe.title.clone(),
                    entry.score.missing.join(", "),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

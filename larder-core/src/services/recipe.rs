//! Recipe service - catalog reads, search, and pantry-aware ranking

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Error;
use crate::domain::score::{score_recipe, RecipeScore};
use crate::domain::Recipe;

/// Recipe service
pub struct RecipeService {
    repository: Arc<DuckDbRepository>,
}

/// A recipe paired with its score against a user's pantry
#[derive(Debug, Serialize)]
pub struct RankedRecipe {
    pub recipe: Recipe,
    pub score: RecipeScore,
}

impl RecipeService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    pub fn list(&self) -> Result<Vec<Recipe>> {
        self.repository.get_recipes()
    }

    pub fn get(&self, recipe_id: Uuid) -> Result<Recipe> {
        match self.repository.get_recipe_by_id(&recipe_id.to_string())? {
            Some(r) => Ok(r),
            None => Err(Error::not_found("recipe").into()),
        }
    }

    /// Case-insensitive substring search over title and description
    pub fn search(&self, keyword: &str) -> Result<Vec<Recipe>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return self.list();
        }
        self.repository.search_recipes(keyword)
    }

    /// Score every recipe against the user's pantry, best first
    ///
    /// Pantry names are resolved through the ingredient alias table so
    /// "scallions" in the pantry matches "scallion" in a recipe.
    pub fn rank_for_pantry(&self, user_id: Uuid) -> Result<Vec<RankedRecipe>> {
        let pantry = self.repository.get_pantry_items(&user_id.to_string())?;

        let mut pantry_names: HashSet<String> = HashSet::new();
        for item in pantry.iter().filter(|i| i.quantity > 0) {
            let canonical = self.repository.resolve_ingredient_name(&item.name)?;
            pantry_names.insert(canonical.to_lowercase());
        }

        let mut ranked: Vec<RankedRecipe> = self
            .list()?
            .into_iter()
            .map(|recipe| {
                let score = score_recipe(&recipe, &pantry_names);
                RankedRecipe { recipe, score }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total
                .partial_cmp(&a.score.total)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.recipe.title.cmp(&b.recipe.title))
        });

        Ok(ranked)
    }

    /// Score a single recipe against the user's pantry
    pub fn score_for_pantry(&self, user_id: Uuid, recipe_id: Uuid) -> Result<RankedRecipe> {
        let recipe = self.get(recipe_id)?;
        let pantry = self.repository.get_pantry_items(&user_id.to_string())?;

        let mut pantry_names: HashSet<String> = HashSet::new();
        for item in pantry.iter().filter(|i| i.quantity > 0) {
            let canonical = self.repository.resolve_ingredient_name(&item.name)?;
            pantry_names.insert(canonical.to_lowercase());
        }

        let score = score_recipe(&recipe, &pantry_names);
        Ok(RankedRecipe { recipe, score })
    }
}

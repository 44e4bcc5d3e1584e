//! Recipe domain model
//!
//! Recipes are read-only after seeding. Steps, the raw ingredient list and
//! nutrition facts are stored as embedded JSON text; ingredients are
//! additionally normalized into canonical ingredient rows for matching.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};

/// Role of an ingredient within a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientRole {
    Required,
    Optional,
}

impl IngredientRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientRole::Required => "required",
            IngredientRole::Optional => "optional",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "required" => IngredientRole::Required,
            _ => IngredientRole::Optional,
        }
    }
}

/// One ingredient line of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default = "default_role")]
    pub role: IngredientRole,
}

fn default_role() -> IngredientRole {
    IngredientRole::Optional
}

/// Nutrition facts per serving
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: f64,
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub fat_g: Option<f64>,
    #[serde(default)]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    pub sodium_mg: Option<f64>,
}

/// A recipe with its ingredient list and nutrition facts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub nutrition: NutritionFacts,
}

impl Recipe {
    pub fn new(id: Uuid, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            steps: Vec::new(),
            ingredients: Vec::new(),
            nutrition: NutritionFacts::default(),
        }
    }

    /// Validate recipe data
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("recipe title cannot be empty"));
        }
        Ok(())
    }

    /// Assign roles the way the seeder does: first two ingredient lines are
    /// required, the rest optional.
    pub fn assign_roles(&mut self) {
        for (idx, ing) in self.ingredients.iter_mut().enumerate() {
            ing.role = if idx < 2 {
                IngredientRole::Required
            } else {
                IngredientRole::Optional
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_assignment() {
        let mut recipe = Recipe::new(Uuid::new_v4(), "Fried Rice", "Quick weeknight rice");
        for name in ["rice", "egg", "scallion", "soy sauce"] {
            recipe.ingredients.push(RecipeIngredient {
                name: name.to_string(),
                quantity: None,
                unit: None,
                role: IngredientRole::Optional,
            });
        }
        recipe.assign_roles();

        assert_eq!(recipe.ingredients[0].role, IngredientRole::Required);
        assert_eq!(recipe.ingredients[1].role, IngredientRole::Required);
        assert_eq!(recipe.ingredients[2].role, IngredientRole::Optional);
        assert_eq!(recipe.ingredients[3].role, IngredientRole::Optional);
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(IngredientRole::parse("required"), IngredientRole::Required);
        assert_eq!(IngredientRole::parse("optional"), IngredientRole::Optional);
        assert_eq!(IngredientRole::parse("junk"), IngredientRole::Optional);
    }
}

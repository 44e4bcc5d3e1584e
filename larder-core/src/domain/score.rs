//! Recipe scoring - pantry match rate and nutrition grading
//!
//! Pure functions over small in-memory collections. The repository resolves
//! ingredient aliases before calling in; matching here is case-insensitive
//! on the already-canonical names.

use std::collections::HashSet;

use serde::Serialize;

use super::recipe::{NutritionFacts, Recipe};

/// Weight of the pantry match rate in the total score
const MATCH_WEIGHT: f64 = 0.6;
/// Weight of the nutrition score in the total score
const NUTRITION_WEIGHT: f64 = 0.4;

/// Nutrition thresholds and their penalties
const CALORIES_HIGH: f64 = 700.0;
const CALORIES_MODERATE: f64 = 500.0;
const FAT_HIGH_G: f64 = 30.0;
const SODIUM_HIGH_MG: f64 = 1000.0;
const PROTEIN_LOW_G: f64 = 20.0;

/// Score of a recipe against a pantry
#[derive(Debug, Clone, Serialize)]
pub struct RecipeScore {
    /// Fraction of recipe ingredients present in the pantry, 0.0..=1.0
    pub match_rate: f64,
    /// Names of recipe ingredients the pantry is missing
    pub missing: Vec<String>,
    /// Nutrition score, 0..=100
    pub nutrition_score: f64,
    /// Weighted total, 0..=100
    pub total: f64,
    /// Letter grade bucket for the total
    pub grade: char,
}

/// Compute the fraction of recipe ingredients available in the pantry
///
/// `pantry_names` holds canonical names of items with quantity > 0.
/// A recipe with no ingredients scores 0.
pub fn match_rate(recipe: &Recipe, pantry_names: &HashSet<String>) -> (f64, Vec<String>) {
    if recipe.ingredients.is_empty() {
        return (0.0, Vec::new());
    }

    let mut missing = Vec::new();
    let mut matched = 0usize;
    for ing in &recipe.ingredients {
        if pantry_names.contains(&ing.name.to_lowercase()) {
            matched += 1;
        } else {
            missing.push(ing.name.clone());
        }
    }

    (matched as f64 / recipe.ingredients.len() as f64, missing)
}

/// Score nutrition facts against fixed thresholds, 0..=100
pub fn nutrition_score(facts: &NutritionFacts) -> f64 {
    let mut score: f64 = 100.0;

    if facts.calories > CALORIES_HIGH {
        score -= 25.0;
    } else if facts.calories > CALORIES_MODERATE {
        score -= 10.0;
    }
    if facts.fat_g.map(|f| f > FAT_HIGH_G).unwrap_or(false) {
        score -= 20.0;
    }
    if facts.sodium_mg.map(|s| s > SODIUM_HIGH_MG).unwrap_or(false) {
        score -= 15.0;
    }
    if facts.protein_g.map(|p| p < PROTEIN_LOW_G).unwrap_or(false) {
        score -= 15.0;
    }

    score.clamp(0.0, 100.0)
}

/// Bucket a total score into a letter grade
pub fn letter_grade(total: f64) -> char {
    if total >= 85.0 {
        'A'
    } else if total >= 70.0 {
        'B'
    } else if total >= 55.0 {
        'C'
    } else {
        'D'
    }
}

/// Score a recipe against a pantry: weighted sum of match rate and
/// nutrition score, bucketed into a letter grade.
pub fn score_recipe(recipe: &Recipe, pantry_names: &HashSet<String>) -> RecipeScore {
    let (rate, missing) = match_rate(recipe, pantry_names);
    let nutrition = nutrition_score(&recipe.nutrition);
    let total = MATCH_WEIGHT * rate * 100.0 + NUTRITION_WEIGHT * nutrition;

    RecipeScore {
        match_rate: rate,
        missing,
        nutrition_score: nutrition,
        total,
        grade: letter_grade(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recipe::{IngredientRole, RecipeIngredient};
    use uuid::Uuid;

    fn recipe_with(ingredients: &[&str], nutrition: NutritionFacts) -> Recipe {
        let mut recipe = Recipe::new(Uuid::new_v4(), "Test", "test recipe");
        recipe.ingredients = ingredients
            .iter()
            .map(|n| RecipeIngredient {
                name: n.to_string(),
                quantity: None,
                unit: None,
                role: IngredientRole::Optional,
            })
            .collect();
        recipe.nutrition = nutrition;
        recipe
    }

    fn pantry(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_lowercase()).collect()
    }

    #[test]
    fn test_match_rate_full_and_partial() {
        let recipe = recipe_with(&["rice", "egg"], NutritionFacts::default());

        let (rate, missing) = match_rate(&recipe, &pantry(&["rice", "egg", "salt"]));
        assert_eq!(rate, 1.0);
        assert!(missing.is_empty());

        let (rate, missing) = match_rate(&recipe, &pantry(&["rice"]));
        assert_eq!(rate, 0.5);
        assert_eq!(missing, vec!["egg".to_string()]);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let recipe = recipe_with(&["Tofu"], NutritionFacts::default());
        let (rate, _) = match_rate(&recipe, &pantry(&["tofu"]));
        assert_eq!(rate, 1.0);
    }

    #[test]
    fn test_empty_ingredient_list_scores_zero() {
        let recipe = recipe_with(&[], NutritionFacts::default());
        let (rate, _) = match_rate(&recipe, &pantry(&["rice"]));
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_nutrition_thresholds() {
        // Lean, high-protein dish keeps the full score
        let lean = NutritionFacts {
            calories: 420.0,
            protein_g: Some(32.0),
            fat_g: Some(12.0),
            carbs_g: Some(40.0),
            sodium_mg: Some(600.0),
        };
        assert_eq!(nutrition_score(&lean), 100.0);

        // Heavy dish trips every penalty: 100 - 25 - 20 - 15 - 15
        let heavy = NutritionFacts {
            calories: 950.0,
            protein_g: Some(10.0),
            fat_g: Some(45.0),
            carbs_g: Some(80.0),
            sodium_mg: Some(1500.0),
        };
        assert_eq!(nutrition_score(&heavy), 25.0);

        // Moderate calories only
        let moderate = NutritionFacts {
            calories: 600.0,
            protein_g: Some(25.0),
            fat_g: Some(20.0),
            carbs_g: None,
            sodium_mg: None,
        };
        assert_eq!(nutrition_score(&moderate), 90.0);
    }

    #[test]
    fn test_letter_grades() {
        assert_eq!(letter_grade(92.0), 'A');
        assert_eq!(letter_grade(85.0), 'A');
        assert_eq!(letter_grade(74.5), 'B');
        assert_eq!(letter_grade(55.0), 'C');
        assert_eq!(letter_grade(30.0), 'D');
    }

    #[test]
    fn test_score_recipe_weighting() {
        let recipe = recipe_with(
            &["rice", "egg"],
            NutritionFacts {
                calories: 420.0,
                protein_g: Some(30.0),
                fat_g: Some(10.0),
                carbs_g: Some(50.0),
                sodium_mg: Some(400.0),
            },
        );

        // Full pantry match + clean nutrition = 0.6*100 + 0.4*100
        let score = score_recipe(&recipe, &pantry(&["rice", "egg"]));
        assert_eq!(score.total, 100.0);
        assert_eq!(score.grade, 'A');

        // Half match: 0.6*50 + 0.4*100 = 70 -> B
        let score = score_recipe(&recipe, &pantry(&["rice"]));
        assert_eq!(score.total, 70.0);
        assert_eq!(score.grade, 'B');
    }
}

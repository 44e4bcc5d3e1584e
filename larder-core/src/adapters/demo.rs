//! Demo data generation
//!
//! Deterministic sample data for demo mode. Pantry expiries are staggered
//! relative to today so the expiry alert view always has something to show.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::{
    CookingLog, NutritionFacts, PantryItem, Recipe, RecipeIngredient, RecognitionLog,
};

/// Generate the demo pantry: perishables first, staples later
pub fn generate_demo_pantry(user_id: Uuid) -> Vec<PantryItem> {
    let today = Utc::now().date_naive();

    // (name, quantity, unit, days until expiry)
    let seed: &[(&str, i64, &str, i64)] = &[
        // Perishables inside the default alert window
        ("eggs", 6, "pcs", 2),
        ("milk", 1, "carton", 3),
        ("tofu", 2, "block", 4),
        ("tomato", 8, "pcs", 5),
        ("beef", 1, "lb", 6),
        // Mid-term
        ("spinach", 3, "bunch", 15),
        ("carrot", 3, "pcs", 8),
        ("potato", 2, "pcs", 12),
        ("onion", 5, "pcs", 20),
        ("scallion", 3, "bunch", 18),
        // Staples
        ("salt", 1, "bag", 180),
        ("cooking oil", 1, "bottle", 60),
        ("soy sauce", 1, "bottle", 90),
        ("sugar", 1, "bag", 120),
        ("flour", 1, "bag", 100),
        // Frozen
        ("frozen chicken thigh", 2, "bag", 45),
        ("frozen dumplings", 1, "box", 40),
        // Condiments and dry goods
        ("ketchup", 1, "bottle", 60),
        ("noodles", 3, "pack", 9),
        ("rice", 1, "bag", 25),
    ];

    seed.iter()
        .map(|(name, qty, unit, days)| {
            PantryItem::new(Uuid::new_v4(), user_id, *name, *qty, *unit)
                .with_expiry(today + Duration::days(*days))
        })
        .collect()
}

/// Generate the demo recipe catalog
pub fn generate_demo_recipes() -> Vec<Recipe> {
    vec![
        recipe(
            "Tomato and Egg Stir-fry",
            "A fast homestyle classic with a sweet-savory sauce.",
            &[
                "Beat the eggs with a pinch of salt.",
                "Scramble the eggs over high heat and set aside.",
                "Stir-fry tomato wedges until they release juice.",
                "Return the eggs, season with sugar and salt, serve.",
            ],
            &[
                ("tomato", Some(3.0), Some("pcs")),
                ("eggs", Some(3.0), Some("pcs")),
                ("scallion", Some(1.0), Some("bunch")),
                ("sugar", None, None),
                ("salt", None, None),
            ],
            NutritionFacts {
                calories: 320.0,
                protein_g: Some(18.0),
                fat_g: Some(22.0),
                carbs_g: Some(12.0),
                sodium_mg: Some(650.0),
            },
        ),
        recipe(
            "Beef and Potato Stew",
            "Slow-simmered beef with potatoes and carrots.",
            &[
                "Brown the beef cubes in oil.",
                "Add potato and carrot chunks with soy sauce and water.",
                "Simmer 40 minutes until tender.",
            ],
            &[
                ("beef", Some(1.0), Some("lb")),
                ("potato", Some(2.0), Some("pcs")),
                ("carrot", Some(2.0), Some("pcs")),
                ("onion", Some(1.0), Some("pcs")),
                ("soy sauce", None, None),
            ],
            NutritionFacts {
                calories: 540.0,
                protein_g: Some(35.0),
                fat_g: Some(24.0),
                carbs_g: Some(42.0),
                sodium_mg: Some(900.0),
            },
        ),
        recipe(
            "Spinach Tofu Soup",
            "A light soup that comes together in ten minutes.",
            &[
                "Bring stock to a boil and add cubed tofu.",
                "Add spinach and simmer two minutes.",
                "Season with salt and a drop of oil.",
            ],
            &[
                ("tofu", Some(1.0), Some("block")),
                ("spinach", Some(1.0), Some("bunch")),
                ("salt", None, None),
            ],
            NutritionFacts {
                calories: 180.0,
                protein_g: Some(14.0),
                fat_g: Some(8.0),
                carbs_g: Some(10.0),
                sodium_mg: Some(480.0),
            },
        ),
        recipe(
            "Fried Rice with Egg",
            "Day-old rice, eggs, and whatever vegetables are on hand.",
            &[
                "Scramble the eggs and set aside.",
                "Fry the rice over high heat, breaking up clumps.",
                "Add diced carrot and scallion, return the eggs, season.",
            ],
            &[
                ("rice", Some(2.0), Some("cup")),
                ("eggs", Some(2.0), Some("pcs")),
                ("carrot", Some(1.0), Some("pcs")),
                ("scallion", Some(1.0), Some("bunch")),
                ("soy sauce", None, None),
            ],
            NutritionFacts {
                calories: 620.0,
                protein_g: Some(16.0),
                fat_g: Some(18.0),
                carbs_g: Some(95.0),
                sodium_mg: Some(820.0),
            },
        ),
        recipe(
            "Pan-fried Dumplings",
            "Crisp-bottomed dumplings straight from the freezer.",
            &[
                "Arrange frozen dumplings in an oiled pan.",
                "Add water, cover, and steam until cooked through.",
                "Uncover and fry until the bottoms crisp.",
            ],
            &[
                ("frozen dumplings", Some(12.0), Some("pcs")),
                ("cooking oil", None, None),
            ],
            NutritionFacts {
                calories: 480.0,
                protein_g: Some(20.0),
                fat_g: Some(19.0),
                carbs_g: Some(58.0),
                sodium_mg: Some(1100.0),
            },
        ),
        recipe(
            "Chicken Noodle Bowl",
            "Braised chicken thigh over noodles in a soy broth.",
            &[
                "Braise chicken thigh in soy sauce and sugar.",
                "Boil the noodles and drain.",
                "Slice the chicken over the noodles and ladle broth.",
            ],
            &[
                ("frozen chicken thigh", Some(1.0), Some("bag")),
                ("noodles", Some(2.0), Some("pack")),
                ("scallion", Some(1.0), Some("bunch")),
                ("soy sauce", None, None),
                ("sugar", None, None),
            ],
            NutritionFacts {
                calories: 680.0,
                protein_g: Some(38.0),
                fat_g: Some(22.0),
                carbs_g: Some(80.0),
                sodium_mg: Some(1300.0),
            },
        ),
    ]
}

fn recipe(
    title: &str,
    description: &str,
    steps: &[&str],
    ingredients: &[(&str, Option<f64>, Option<&str>)],
    nutrition: NutritionFacts,
) -> Recipe {
    let mut r = Recipe::new(Uuid::new_v4(), title, description);
    r.steps = steps.iter().map(|s| s.to_string()).collect();
    r.ingredients = ingredients
        .iter()
        .map(|(name, qty, unit)| RecipeIngredient {
            name: name.to_string(),
            quantity: *qty,
            unit: unit.map(|u| u.to_string()),
            role: crate::domain::IngredientRole::Optional,
        })
        .collect();
    r.assign_roles();
    r.nutrition = nutrition;
    r
}

/// Generate a week of cooking history cycling through the given recipes
pub fn generate_demo_cooking_logs(user_id: Uuid, recipe_ids: &[Uuid]) -> Vec<CookingLog> {
    if recipe_ids.is_empty() {
        return Vec::new();
    }

    let today = Utc::now().date_naive();
    // (recipe index, days ago)
    let history: &[(usize, i64)] = &[
        (0, 7),
        (2, 6),
        (0, 5),
        (2, 4),
        (1, 3),
        (0, 2),
        (3, 1),
        (1, 0),
    ];

    history
        .iter()
        .map(|(idx, days_ago)| CookingLog {
            id: Uuid::new_v4(),
            user_id,
            recipe_id: recipe_ids[idx % recipe_ids.len()],
            cooked_on: today - Duration::days(*days_ago),
        })
        .collect()
}

/// Generate sample recognition history
pub fn generate_demo_recognition_logs(user_id: Uuid) -> Vec<RecognitionLog> {
    let now = Utc::now();
    // (days ago, items detected)
    let history: &[(i64, i64)] = &[(8, 3), (6, 2), (4, 5), (2, 4), (1, 6), (0, 2)];

    history
        .iter()
        .map(|(days_ago, count)| RecognitionLog {
            id: Uuid::new_v4(),
            user_id,
            recognized_at: now - Duration::days(*days_ago),
            items_count: *count,
        })
        .collect()
}

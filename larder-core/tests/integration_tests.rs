//! Integration tests for larder-core services
//!
//! These tests verify data integrity scenarios using real DuckDB.
//! Vision IO is mocked at the trait level, but all database operations are real.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use larder_core::adapters::duckdb::DuckDbRepository;
use larder_core::adapters::MockVision;
use larder_core::domain::{
    IngredientRole, PantryItem, Recipe, RecipeIngredient, RecognizedItem,
};
use larder_core::services::{
    AuthService, CookingService, DemoService, PantryService, RecipeService, RecognitionService,
    StatusService, DEMO_PASSWORD, DEMO_USERNAME,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a test repository with schema initialized
fn create_test_repo(temp_dir: &TempDir) -> Arc<DuckDbRepository> {
    let db_path = temp_dir.path().join("test.duckdb");
    let repo = DuckDbRepository::new(&db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

/// Register a user and return their id
fn register_user(repo: &Arc<DuckDbRepository>, username: &str) -> Uuid {
    let auth = AuthService::new(Arc::clone(repo));
    auth.register(username, "hunter2hunter2").unwrap().id
}

fn seed_recipes(repo: &Arc<DuckDbRepository>) -> Vec<Uuid> {
    let recipes = larder_core::adapters::demo::generate_demo_recipes();
    for r in &recipes {
        repo.insert_recipe(r).unwrap();
    }
    recipes.iter().map(|r| r.id).collect()
}

// ============================================================================
// Auth
// ============================================================================

#[test]
fn test_register_and_login_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let auth = AuthService::new(Arc::clone(&repo));

    let user = auth.register("Alice", "correct horse").unwrap();
    assert_eq!(user.username, "alice", "usernames are normalized");

    // Login is case-insensitive on username
    let logged_in = auth.login(" ALICE ", "correct horse").unwrap();
    assert_eq!(logged_in.id, user.id);
}

#[test]
fn test_login_failures_are_indistinguishable() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let auth = AuthService::new(Arc::clone(&repo));

    auth.register("bob", "password123").unwrap();

    let unknown_user = auth.login("nobody", "password123").unwrap_err();
    let wrong_password = auth.login("bob", "wrong password").unwrap_err();
    assert_eq!(unknown_user.to_string(), wrong_password.to_string());
}

#[test]
fn test_duplicate_username_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let auth = AuthService::new(Arc::clone(&repo));

    auth.register("carol", "password123").unwrap();
    let result = auth.register("Carol", "otherpassword");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("taken"));
}

// ============================================================================
// Pantry
// ============================================================================

#[test]
fn test_pantry_upsert_accumulates_quantity() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "dave");
    let pantry = PantryService::new(Arc::clone(&repo));

    let first_expiry = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let second_expiry = NaiveDate::from_ymd_opt(2026, 9, 10).unwrap();

    pantry.add(user_id, "eggs", 6, "pcs", Some(first_expiry)).unwrap();
    let merged = pantry.add(user_id, "eggs", 4, "pcs", Some(second_expiry)).unwrap();

    assert_eq!(merged.quantity, 10, "quantity accumulates on conflict");
    assert_eq!(
        merged.expiry_date,
        Some(second_expiry),
        "expiry takes the incoming value"
    );

    let items = pantry.list(user_id).unwrap();
    assert_eq!(items.len(), 1, "no duplicate row per (user, name)");
}

#[test]
fn test_pantry_is_isolated_per_user() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let alice = register_user(&repo, "alice");
    let bob = register_user(&repo, "bob");
    let pantry = PantryService::new(Arc::clone(&repo));

    pantry.add(alice, "milk", 1, "carton", None).unwrap();
    pantry.add(bob, "milk", 2, "carton", None).unwrap();

    let alice_items = pantry.list(alice).unwrap();
    let bob_items = pantry.list(bob).unwrap();
    assert_eq!(alice_items.len(), 1);
    assert_eq!(alice_items[0].quantity, 1);
    assert_eq!(bob_items[0].quantity, 2);

    // Bob cannot delete Alice's item
    let result = pantry.remove(bob, alice_items[0].id);
    assert!(result.is_err());
    assert_eq!(pantry.list(alice).unwrap().len(), 1);
}

#[test]
fn test_pantry_update_and_delete() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "erin");
    let pantry = PantryService::new(Arc::clone(&repo));

    let item = pantry.add(user_id, "tofu", 2, "block", None).unwrap();

    let expiry = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
    let updated = pantry
        .update(user_id, item.id, "firm tofu", 3, "block", Some(expiry))
        .unwrap();
    assert_eq!(updated.name, "firm tofu");
    assert_eq!(updated.quantity, 3);
    assert_eq!(updated.expiry_date, Some(expiry));

    pantry.remove(user_id, item.id).unwrap();
    assert!(pantry.list(user_id).unwrap().is_empty());
}

#[test]
fn test_expiry_alerts_respect_window() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "frank");
    let pantry = PantryService::new(Arc::clone(&repo));

    let today = Utc::now().date_naive();
    pantry
        .add(user_id, "milk", 1, "carton", Some(today + Duration::days(2)))
        .unwrap();
    pantry
        .add(user_id, "yogurt", 1, "cup", Some(today + Duration::days(7)))
        .unwrap();
    pantry
        .add(user_id, "rice", 1, "bag", Some(today + Duration::days(30)))
        .unwrap();
    pantry.add(user_id, "salt", 1, "bag", None).unwrap();

    let alerts = pantry.expiry_alerts(user_id, 7).unwrap();
    let names: Vec<_> = alerts.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["milk", "yogurt"], "sorted soonest first, window inclusive");
}

#[test]
fn test_add_recognized_rounds_quantities() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "grace");
    let pantry = PantryService::new(Arc::clone(&repo));

    let items = vec![
        RecognizedItem {
            name: "tomato".to_string(),
            quantity: Some(2.6),
            confidence: Some(0.9),
        },
        RecognizedItem {
            name: "cheese".to_string(),
            quantity: None,
            confidence: Some(0.7),
        },
        RecognizedItem {
            name: "   ".to_string(),
            quantity: Some(1.0),
            confidence: None,
        },
    ];

    let added = pantry.add_recognized(user_id, &items).unwrap();
    assert_eq!(added, 2, "blank names are skipped");

    let stored = pantry.list(user_id).unwrap();
    let tomato = stored.iter().find(|i| i.name == "tomato").unwrap();
    assert_eq!(tomato.quantity, 3, "fractional quantity rounds");
    let cheese = stored.iter().find(|i| i.name == "cheese").unwrap();
    assert_eq!(cheese.quantity, 1, "missing quantity defaults to 1");
}

// ============================================================================
// Recipes and scoring
// ============================================================================

#[test]
fn test_recipe_seed_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    seed_recipes(&repo);
    let count_before = repo.get_recipe_count().unwrap();
    seed_recipes(&repo);
    assert_eq!(repo.get_recipe_count().unwrap(), count_before);
}

#[test]
fn test_recipe_roles_are_stored_not_positional() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);

    // Roles deliberately disagree with first-two-required ordering
    let mut recipe = Recipe::new(
        Uuid::new_v4(),
        "Pantry Omelette",
        "Eggs with whatever is around",
    );
    for (name, role) in [
        ("egg", IngredientRole::Required),
        ("butter", IngredientRole::Optional),
        ("chives", IngredientRole::Required),
    ] {
        recipe.ingredients.push(RecipeIngredient {
            name: name.to_string(),
            quantity: None,
            unit: None,
            role,
        });
    }
    repo.insert_recipe(&recipe).unwrap();

    let stored = repo
        .get_recipe_by_id(&recipe.id.to_string())
        .unwrap()
        .unwrap();
    let roles: Vec<IngredientRole> = stored.ingredients.iter().map(|i| i.role).collect();
    assert_eq!(
        roles,
        vec![
            IngredientRole::Required,
            IngredientRole::Optional,
            IngredientRole::Required,
        ]
    );
}

#[test]
fn test_recipe_search_is_case_insensitive() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    seed_recipes(&repo);
    let recipes = RecipeService::new(Arc::clone(&repo));

    let hits = recipes.search("TOMATO").unwrap();
    assert!(!hits.is_empty());
    assert!(hits
        .iter()
        .any(|r| r.title.to_lowercase().contains("tomato")));

    let empty_keyword = recipes.search("   ").unwrap();
    assert_eq!(
        empty_keyword.len() as i64,
        repo.get_recipe_count().unwrap(),
        "blank keyword lists everything"
    );
}

#[test]
fn test_ranking_prefers_stocked_pantry() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "heidi");
    seed_recipes(&repo);

    let pantry = PantryService::new(Arc::clone(&repo));
    // Stock everything the tofu soup needs and nothing else
    pantry.add(user_id, "tofu", 1, "block", None).unwrap();
    pantry.add(user_id, "spinach", 1, "bunch", None).unwrap();
    pantry.add(user_id, "salt", 1, "bag", None).unwrap();

    let recipes = RecipeService::new(Arc::clone(&repo));
    let ranked = recipes.rank_for_pantry(user_id).unwrap();
    assert!(!ranked.is_empty());
    assert_eq!(ranked[0].recipe.title, "Spinach Tofu Soup");
    assert_eq!(ranked[0].score.match_rate, 1.0);
    assert!(ranked[0].score.missing.is_empty());

    // Scores are non-increasing down the list
    for pair in ranked.windows(2) {
        assert!(pair[0].score.total >= pair[1].score.total);
    }
}

#[test]
fn test_zero_quantity_items_do_not_match() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "ivan");
    seed_recipes(&repo);

    let item = PantryItem::new(Uuid::new_v4(), user_id, "tofu", 0, "block");
    repo.upsert_pantry_item(&item).unwrap();

    let recipes = RecipeService::new(Arc::clone(&repo));
    let ranked = recipes.rank_for_pantry(user_id).unwrap();
    let soup = ranked
        .iter()
        .find(|r| r.recipe.title == "Spinach Tofu Soup")
        .unwrap();
    assert!(soup.score.missing.iter().any(|m| m == "tofu"));
}

#[test]
fn test_ingredient_alias_resolution_in_ranking() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "judy");
    seed_recipes(&repo);

    repo.add_ingredient_alias("scallions", "scallion").unwrap();

    let pantry = PantryService::new(Arc::clone(&repo));
    pantry.add(user_id, "scallions", 2, "bunch", None).unwrap();

    let recipes = RecipeService::new(Arc::clone(&repo));
    let ranked = recipes.rank_for_pantry(user_id).unwrap();
    let stir_fry = ranked
        .iter()
        .find(|r| r.recipe.title == "Tomato and Egg Stir-fry")
        .unwrap();
    assert!(
        !stir_fry.score.missing.iter().any(|m| m == "scallion"),
        "alias should satisfy the scallion line"
    );
}

#[test]
fn test_score_matches_manual_computation() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "kevin");
    seed_recipes(&repo);

    let recipes = RecipeService::new(Arc::clone(&repo));
    let all = recipes.list().unwrap();
    let soup = all
        .iter()
        .find(|r| r.title == "Spinach Tofu Soup")
        .unwrap();

    let ranked = recipes.score_for_pantry(user_id, soup.id).unwrap();

    // Empty pantry: match component is 0, nutrition carries the rest.
    // Soup is 180 kcal, 14g protein (low-protein penalty): 85 nutrition.
    let pantry_names: HashSet<String> = HashSet::new();
    let expected = larder_core::domain::score::score_recipe(soup, &pantry_names);
    assert_eq!(ranked.score.total, expected.total);
    assert_eq!(ranked.score.nutrition_score, 85.0);
    assert_eq!(ranked.score.total, 0.4 * 85.0);
    assert_eq!(ranked.score.grade, 'D');
}

// ============================================================================
// Cooking history
// ============================================================================

#[test]
fn test_cooking_history_range_and_distinct_count() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "laura");
    let recipe_ids = seed_recipes(&repo);
    let cooking = CookingService::new(Arc::clone(&repo));

    let base = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
    cooking.log(user_id, recipe_ids[0], base).unwrap();
    cooking
        .log(user_id, recipe_ids[0], base + Duration::days(2))
        .unwrap();
    cooking
        .log(user_id, recipe_ids[1], base + Duration::days(5))
        .unwrap();
    cooking
        .log(user_id, recipe_ids[2], base + Duration::days(20))
        .unwrap();

    let history = cooking
        .history(user_id, base, base + Duration::days(7))
        .unwrap();
    assert_eq!(history.len(), 3, "BETWEEN is inclusive, out-of-range rows excluded");
    assert!(history.windows(2).all(|w| w[0].cooked_on <= w[1].cooked_on));
    assert!(!history[0].recipe_title.is_empty());

    // Repeats of the same recipe count once
    assert_eq!(cooking.distinct_recipes_cooked(user_id).unwrap(), 3);
}

#[test]
fn test_cooking_log_rejects_unknown_recipe() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "mallory");
    let cooking = CookingService::new(Arc::clone(&repo));

    let result = cooking.log(user_id, Uuid::new_v4(), Utc::now().date_naive());
    assert!(result.is_err());
}

#[test]
fn test_cooking_history_rejects_inverted_range() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "nina");
    let cooking = CookingService::new(Arc::clone(&repo));

    let start = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
    assert!(cooking.history(user_id, start, end).is_err());
}

// ============================================================================
// Recognition
// ============================================================================

#[test]
fn test_recognition_logs_are_ordered_and_limited() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "oscar");

    let service =
        RecognitionService::new(Arc::clone(&repo), Box::new(MockVision::new()), temp_dir.path());

    for _ in 0..3 {
        service.recognize(user_id, b"img", "image/jpeg").unwrap();
    }

    let logs = service.history(user_id, 2).unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].recognized_at >= logs[1].recognized_at);
}

// ============================================================================
// Status and demo mode
// ============================================================================

#[test]
fn test_status_summary_counts() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repo(&temp_dir);
    let user_id = register_user(&repo, "peggy");
    let recipe_ids = seed_recipes(&repo);

    let pantry = PantryService::new(Arc::clone(&repo));
    pantry.add(user_id, "rice", 1, "bag", None).unwrap();
    pantry.add(user_id, "eggs", 6, "pcs", None).unwrap();

    let cooking = CookingService::new(Arc::clone(&repo));
    cooking
        .log(user_id, recipe_ids[0], Utc::now().date_naive())
        .unwrap();

    let status = StatusService::new(Arc::clone(&repo));
    let summary = status.get_status(user_id, "peggy", 7).unwrap();
    assert_eq!(summary.pantry_items, 2);
    assert_eq!(summary.cooking_logs, 1);
    assert_eq!(summary.distinct_recipes_cooked, 1);
    assert_eq!(summary.recipes as usize, recipe_ids.len());

    let anon = status.get_anonymous_status().unwrap();
    assert_eq!(anon.users, 1);
}

#[test]
fn test_demo_mode_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let demo = DemoService::new(temp_dir.path());

    assert!(!demo.is_enabled().unwrap());
    demo.enable().unwrap();
    assert!(demo.is_enabled().unwrap());

    // The demo database is seeded and the demo account can log in
    let demo_db = temp_dir.path().join("demo.duckdb");
    assert!(demo_db.exists());

    let repo = Arc::new(DuckDbRepository::new(&demo_db).unwrap());
    let auth = AuthService::new(Arc::clone(&repo));
    let user = auth.login(DEMO_USERNAME, DEMO_PASSWORD).unwrap();

    assert!(repo.get_pantry_items(&user.id.to_string()).unwrap().len() >= 20);
    assert!(repo.get_recipe_count().unwrap() >= 5);
    assert!(repo.get_cooking_log_count(&user.id.to_string()).unwrap() >= 8);

    demo.disable(true).unwrap();
    assert!(!demo.is_enabled().unwrap());
    assert!(!demo_db.exists());
}

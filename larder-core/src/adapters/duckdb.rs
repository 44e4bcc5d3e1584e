//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use duckdb::{params, Connection};
use uuid::Uuid;

use crate::domain::{
    CookingLog, NutritionFacts, PantryItem, Recipe, RecipeIngredient, RecognitionLog, User,
};
use crate::services::MigrationService;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Create a new DuckDB repository
    ///
    /// Includes retry logic with exponential backoff for file locking errors,
    /// which can occur when two larder invocations race on the same data dir.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[larder] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    /// Attempt to open a database connection (called by new() with retry logic)
    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(conn)
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<crate::services::MigrationResult> {
        let conn = self.conn.lock().unwrap();
        let migration_service = MigrationService::new(&conn);
        migration_service.run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // === User operations ===

    /// Insert a new user. A duplicate username surfaces as an error.
    pub fn create_user(&self, user: &User) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (user_id, username, password_hash, created_at)
             VALUES (?, ?, ?, ?)",
            params![
                user.id.to_string(),
                user.username,
                user.password_hash,
                user.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| {
            let msg = e.to_string();
            if msg.to_lowercase().contains("constraint") {
                anyhow!("username '{}' is already taken", user.username)
            } else {
                anyhow!(msg)
            }
        })?;
        Ok(())
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, username, password_hash, created_at::VARCHAR
             FROM users WHERE username = ?",
        )?;

        let user = stmt.query_row([username], |row| Ok(row_to_user(row))).ok();
        Ok(user)
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, username, password_hash, created_at::VARCHAR
             FROM users WHERE user_id = ?",
        )?;

        let user = stmt.query_row([id], |row| Ok(row_to_user(row))).ok();
        Ok(user)
    }

    pub fn get_user_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Pantry operations ===

    /// List a user's pantry, newest first
    pub fn get_pantry_items(&self, user_id: &str) -> Result<Vec<PantryItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT item_id, user_id, name, quantity, unit, expiry_date::VARCHAR,
                    created_at::VARCHAR, updated_at::VARCHAR
             FROM pantry_items
             WHERE user_id = ?
             ORDER BY created_at DESC, name",
        )?;

        let items = stmt
            .query_map([user_id], |row| Ok(row_to_pantry_item(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(items)
    }

    pub fn get_pantry_item_by_id(&self, user_id: &str, item_id: &str) -> Result<Option<PantryItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT item_id, user_id, name, quantity, unit, expiry_date::VARCHAR,
                    created_at::VARCHAR, updated_at::VARCHAR
             FROM pantry_items
             WHERE item_id = ? AND user_id = ?",
        )?;

        let item = stmt
            .query_row([item_id, user_id], |row| Ok(row_to_pantry_item(row)))
            .ok();
        Ok(item)
    }

    /// Upsert a pantry item by (user, name)
    ///
    /// On conflict the quantity ACCUMULATES; unit and expiry take the
    /// incoming value. This matches how repeated shopping trips behave.
    pub fn upsert_pantry_item(&self, item: &PantryItem) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO pantry_items (item_id, user_id, name, quantity, unit, expiry_date,
                                       created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_id, name) DO UPDATE SET
                quantity = pantry_items.quantity + EXCLUDED.quantity,
                unit = EXCLUDED.unit,
                expiry_date = EXCLUDED.expiry_date,
                updated_at = EXCLUDED.updated_at",
            params![
                item.id.to_string(),
                item.user_id.to_string(),
                item.name,
                item.quantity,
                item.unit,
                item.expiry_date.map(|d| d.to_string()),
                item.created_at.to_rfc3339(),
                item.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Replace all editable fields of an existing item, scoped to the owner
    pub fn update_pantry_item(&self, item: &PantryItem) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE pantry_items
             SET name = ?, quantity = ?, unit = ?, expiry_date = ?, updated_at = ?
             WHERE item_id = ? AND user_id = ?",
            params![
                item.name,
                item.quantity,
                item.unit,
                item.expiry_date.map(|d| d.to_string()),
                Utc::now().to_rfc3339(),
                item.id.to_string(),
                item.user_id.to_string(),
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn delete_pantry_item(&self, user_id: &str, item_id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "DELETE FROM pantry_items WHERE item_id = ? AND user_id = ?",
            params![item_id, user_id],
        )?;
        Ok(rows > 0)
    }

    /// Items expiring on or before the cutoff, soonest first
    ///
    /// The cutoff is computed in Rust to avoid the ICU extension dependency.
    pub fn get_expiring_items(&self, user_id: &str, cutoff: NaiveDate) -> Result<Vec<PantryItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT item_id, user_id, name, quantity, unit, expiry_date::VARCHAR,
                    created_at::VARCHAR, updated_at::VARCHAR
             FROM pantry_items
             WHERE user_id = ? AND expiry_date IS NOT NULL AND expiry_date <= ?
             ORDER BY expiry_date ASC",
        )?;

        let items = stmt
            .query_map(params![user_id, cutoff.to_string()], |row| {
                Ok(row_to_pantry_item(row))
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(items)
    }

    pub fn get_pantry_item_count(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM pantry_items WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // === Recipe operations ===

    /// Insert a recipe with normalized ingredient rows (seed path)
    ///
    /// Skips insertion when a recipe with the same title already exists,
    /// making seeding idempotent. Ingredient roles follow the recipe's
    /// ingredient list; canonical ingredient rows are created on demand.
    pub fn insert_recipe(&self, recipe: &Recipe) -> Result<bool> {
        let conn = self.conn.lock().unwrap();

        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipes WHERE title = ?",
            params![recipe.title],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO recipes (recipe_id, title, description, steps_json,
                                  ingredients_json, nutrition_json)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                recipe.id.to_string(),
                recipe.title,
                recipe.description,
                serde_json::to_string(&recipe.steps)?,
                serde_json::to_string(&recipe.ingredients)?,
                serde_json::to_string(&recipe.nutrition)?,
            ],
        )?;

        for ing in &recipe.ingredients {
            let name = ing.name.trim();
            if name.is_empty() {
                continue;
            }
            let ingredient_id = get_or_create_ingredient(&conn, name)?;
            conn.execute(
                "INSERT OR IGNORE INTO recipe_ingredients (recipe_id, ingredient_id, amount, unit, role)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    recipe.id.to_string(),
                    ingredient_id,
                    ing.quantity,
                    ing.unit,
                    ing.role.as_str(),
                ],
            )?;
        }

        Ok(true)
    }

    /// List all recipes with their ingredient lists attached, ordered by title
    pub fn get_recipes(&self) -> Result<Vec<Recipe>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT recipe_id, title, description, steps_json, ingredients_json, nutrition_json
             FROM recipes
             ORDER BY title ASC",
        )?;

        let recipes = stmt
            .query_map([], |row| Ok(row_to_recipe(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(recipes)
    }

    pub fn get_recipe_by_id(&self, id: &str) -> Result<Option<Recipe>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT recipe_id, title, description, steps_json, ingredients_json, nutrition_json
             FROM recipes WHERE recipe_id = ?",
        )?;

        let recipe = stmt.query_row([id], |row| Ok(row_to_recipe(row))).ok();
        Ok(recipe)
    }

    /// Search recipes by title or description, case-insensitive substring
    pub fn search_recipes(&self, keyword: &str) -> Result<Vec<Recipe>> {
        let conn = self.conn.lock().unwrap();
        let pattern = format!("%{}%", keyword.to_lowercase());
        let mut stmt = conn.prepare(
            "SELECT recipe_id, title, description, steps_json, ingredients_json, nutrition_json
             FROM recipes
             WHERE LOWER(title) LIKE ? OR LOWER(description) LIKE ?
             ORDER BY title ASC",
        )?;

        let recipes = stmt
            .query_map(params![pattern, pattern], |row| Ok(row_to_recipe(row)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(recipes)
    }

    pub fn get_recipe_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Ingredient alias operations ===

    /// Register an alias for a canonical ingredient name
    pub fn add_ingredient_alias(&self, alias: &str, canonical: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let ingredient_id = get_or_create_ingredient(&conn, canonical)?;
        conn.execute(
            "INSERT OR REPLACE INTO ingredient_alias (alias, ingredient_id) VALUES (?, ?)",
            params![alias.to_lowercase(), ingredient_id],
        )?;
        Ok(())
    }

    /// Resolve a name through the alias table to its canonical form
    ///
    /// Names without an alias entry resolve to themselves.
    pub fn resolve_ingredient_name(&self, name: &str) -> Result<String> {
        let conn = self.conn.lock().unwrap();
        let canonical: Option<String> = conn
            .query_row(
                "SELECT i.name_canonical
                 FROM ingredient_alias a
                 JOIN ingredients i ON i.ingredient_id = a.ingredient_id
                 WHERE a.alias = ?",
                params![name.trim().to_lowercase()],
                |row| row.get(0),
            )
            .ok();
        Ok(canonical.unwrap_or_else(|| name.trim().to_string()))
    }

    // === Cooking log operations ===

    pub fn add_cooking_log(&self, log: &CookingLog) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO cooking_log (log_id, user_id, recipe_id, cooked_on)
             VALUES (?, ?, ?, ?)",
            params![
                log.id.to_string(),
                log.user_id.to_string(),
                log.recipe_id.to_string(),
                log.cooked_on.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Cooking history within [start, end], oldest first
    pub fn get_cooking_logs_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CookingLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT log_id, user_id, recipe_id, cooked_on::VARCHAR
             FROM cooking_log
             WHERE user_id = ? AND cooked_on BETWEEN ? AND ?
             ORDER BY cooked_on ASC",
        )?;

        let logs = stmt
            .query_map(params![user_id, start.to_string(), end.to_string()], |row| {
                Ok(row_to_cooking_log(row))
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(logs)
    }

    /// Number of DISTINCT recipes the user has cooked
    pub fn get_distinct_recipes_cooked(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT recipe_id) FROM cooking_log WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn get_cooking_log_count(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM cooking_log WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // === Recognition log operations ===

    pub fn add_recognition_log(&self, log: &RecognitionLog) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO recognition_logs (log_id, user_id, recognized_at, items_count)
             VALUES (?, ?, ?, ?)",
            params![
                log.id.to_string(),
                log.user_id.to_string(),
                log.recognized_at.to_rfc3339(),
                log.items_count,
            ],
        )?;
        Ok(())
    }

    /// Latest recognition passes for a user, newest first
    pub fn get_recognition_logs(&self, user_id: &str, limit: usize) -> Result<Vec<RecognitionLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT log_id, user_id, recognized_at::VARCHAR, items_count
             FROM recognition_logs
             WHERE user_id = ?
             ORDER BY recognized_at DESC
             LIMIT ?",
        )?;

        let logs = stmt
            .query_map(params![user_id, limit as i64], |row| {
                Ok(row_to_recognition_log(row))
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(logs)
    }

    pub fn get_recognition_log_count(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recognition_logs WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Get or create the canonical ingredient row, returning its id
fn get_or_create_ingredient(conn: &Connection, name: &str) -> Result<String> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT ingredient_id FROM ingredients WHERE name_canonical = ?",
            params![name],
            |row| row.get(0),
        )
        .ok();

    if let Some(id) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO ingredients (ingredient_id, name_canonical) VALUES (?, ?)",
        params![id, name],
    )?;
    Ok(id)
}

// === Row mappers ===

fn row_to_user(row: &duckdb::Row) -> User {
    let id_str: String = row.get(0).unwrap_or_default();
    let created_str: String = row.get(3).unwrap_or_default();

    User {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
        username: row.get(1).unwrap_or_default(),
        password_hash: row.get(2).unwrap_or_default(),
        created_at: parse_timestamp(&created_str),
    }
}

fn row_to_pantry_item(row: &duckdb::Row) -> PantryItem {
    let id_str: String = row.get(0).unwrap_or_default();
    let user_id_str: String = row.get(1).unwrap_or_default();
    let expiry_str: Option<String> = row.get(5).ok();
    let created_str: String = row.get(6).unwrap_or_default();
    let updated_str: String = row.get(7).unwrap_or_default();

    PantryItem {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
        user_id: Uuid::parse_str(&user_id_str).unwrap_or_else(|_| Uuid::new_v4()),
        name: row.get(2).unwrap_or_default(),
        quantity: row.get(3).unwrap_or(0),
        unit: row.get(4).unwrap_or_default(),
        expiry_date: expiry_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        created_at: parse_timestamp(&created_str),
        updated_at: parse_timestamp(&updated_str),
    }
}

fn row_to_recipe(row: &duckdb::Row) -> Recipe {
    let id_str: String = row.get(0).unwrap_or_default();
    let steps_json: String = row.get(3).unwrap_or_else(|_| "[]".to_string());
    let ingredients_json: String = row.get(4).unwrap_or_else(|_| "[]".to_string());
    let nutrition_json: String = row.get(5).unwrap_or_else(|_| "{}".to_string());

    let ingredients: Vec<RecipeIngredient> =
        serde_json::from_str(&ingredients_json).unwrap_or_default();

    Recipe {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
        title: row.get(1).unwrap_or_default(),
        description: row.get(2).unwrap_or_default(),
        steps: serde_json::from_str(&steps_json).unwrap_or_default(),
        ingredients,
        nutrition: serde_json::from_str::<NutritionFacts>(&nutrition_json).unwrap_or_default(),
    }
}

fn row_to_cooking_log(row: &duckdb::Row) -> CookingLog {
    let id_str: String = row.get(0).unwrap_or_default();
    let user_id_str: String = row.get(1).unwrap_or_default();
    let recipe_id_str: String = row.get(2).unwrap_or_default();
    let date_str: String = row.get(3).unwrap_or_default();

    CookingLog {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
        user_id: Uuid::parse_str(&user_id_str).unwrap_or_else(|_| Uuid::new_v4()),
        recipe_id: Uuid::parse_str(&recipe_id_str).unwrap_or_else(|_| Uuid::new_v4()),
        cooked_on: parse_date(&date_str),
    }
}

fn row_to_recognition_log(row: &duckdb::Row) -> RecognitionLog {
    let id_str: String = row.get(0).unwrap_or_default();
    let user_id_str: String = row.get(1).unwrap_or_default();
    let recognized_str: String = row.get(2).unwrap_or_default();

    RecognitionLog {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::new_v4()),
        user_id: Uuid::parse_str(&user_id_str).unwrap_or_else(|_| Uuid::new_v4()),
        recognized_at: parse_timestamp(&recognized_str),
        items_count: row.get(3).unwrap_or(0),
    }
}

// === Parsing helpers ===

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    // DuckDB renders TIMESTAMP columns without a timezone suffix
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|_| Utc::now().date_naive())
}

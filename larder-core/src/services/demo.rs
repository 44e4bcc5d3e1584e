//! Demo service - manage demo mode
//!
//! Demo mode provides a pre-populated sandbox database for trying the app
//! without registering or photographing anything.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::adapters::demo::{
    generate_demo_cooking_logs, generate_demo_pantry, generate_demo_recipes,
    generate_demo_recognition_logs,
};
use crate::adapters::duckdb::DuckDbRepository;
use crate::config::Config;
use crate::services::auth::AuthService;

/// Username and password of the built-in demo account
pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo-pantry";

/// Demo service for managing demo mode
pub struct DemoService {
    larder_dir: PathBuf,
}

impl DemoService {
    pub fn new(larder_dir: &Path) -> Self {
        Self {
            larder_dir: larder_dir.to_path_buf(),
        }
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.larder_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// Deletes any existing demo database, flips the config flag, then
    /// creates a fresh demo database seeded with the demo user, a stocked
    /// pantry, the recipe catalog, and a week of history.
    pub fn enable(&self) -> Result<()> {
        self.remove_demo_database()?;

        let mut config = Config::load(&self.larder_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.set_current_user(DEMO_USERNAME);
        config.save(&self.larder_dir)?;

        let demo_db = self.larder_dir.join("demo.duckdb");
        let repository = Arc::new(DuckDbRepository::new(&demo_db)?);
        repository.ensure_schema()?;

        let auth = AuthService::new(repository.clone());
        let demo_user = auth.register(DEMO_USERNAME, DEMO_PASSWORD)?;

        for item in generate_demo_pantry(demo_user.id) {
            repository.upsert_pantry_item(&item)?;
        }

        let recipes = generate_demo_recipes();
        for recipe in &recipes {
            repository.insert_recipe(recipe)?;
        }

        let recipe_ids: Vec<_> = recipes.iter().map(|r| r.id).collect();
        for log in generate_demo_cooking_logs(demo_user.id, &recipe_ids) {
            repository.add_cooking_log(&log)?;
        }

        for log in generate_demo_recognition_logs(demo_user.id) {
            repository.add_recognition_log(&log)?;
        }

        Ok(())
    }

    /// Disable demo mode, optionally deleting the demo database
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.larder_dir).unwrap_or_default();
        config.disable_demo_mode();
        if config.current_user.as_deref() == Some(DEMO_USERNAME) {
            config.clear_current_user();
        }
        config.save(&self.larder_dir)?;

        if clean {
            self.remove_demo_database()?;
        }

        Ok(())
    }

    fn remove_demo_database(&self) -> Result<()> {
        let demo_db = self.larder_dir.join("demo.duckdb");
        let demo_wal = self.larder_dir.join("demo.duckdb.wal");
        if demo_db.exists() {
            std::fs::remove_file(&demo_db)?;
        }
        if demo_wal.exists() {
            std::fs::remove_file(&demo_wal)?;
        }
        Ok(())
    }
}

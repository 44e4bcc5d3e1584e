//! Larder Core - Business logic for pantry and recipe management
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, PantryItem, Recipe, etc.)
//! - **ports**: Trait definitions for external dependencies (VisionProvider)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, OpenAI vision, demo seed)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};

use adapters::duckdb::DuckDbRepository;
use config::Config;
use ports::VisionProvider;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{CookingLog, PantryItem, Recipe, RecognitionLog, RecognizedItem, User};

/// Main context for larder operations
///
/// The primary entry point for all business logic. It holds the database
/// connection, configuration, and all services.
pub struct LarderContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub larder_dir: PathBuf,
    pub auth_service: AuthService,
    pub pantry_service: PantryService,
    pub recipe_service: RecipeService,
    pub cooking_service: CookingService,
    pub status_service: StatusService,
}

impl LarderContext {
    /// Create a new larder context
    ///
    /// Demo mode switches to a separate demo.duckdb so sandbox data never
    /// mixes with real data.
    pub fn new(larder_dir: &Path) -> Result<Self> {
        let config = Config::load(larder_dir)?;

        let db_filename = if config.demo_mode {
            "demo.duckdb"
        } else {
            "larder.duckdb"
        };

        let db_path = larder_dir.join(db_filename);
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);
        repository.ensure_schema()?;

        let auth_service = AuthService::new(Arc::clone(&repository));
        let pantry_service = PantryService::new(Arc::clone(&repository));
        let recipe_service = RecipeService::new(Arc::clone(&repository));
        let cooking_service = CookingService::new(Arc::clone(&repository));
        let status_service = StatusService::new(Arc::clone(&repository));

        Ok(Self {
            config,
            repository,
            larder_dir: larder_dir.to_path_buf(),
            auth_service,
            pantry_service,
            recipe_service,
            cooking_service,
            status_service,
        })
    }

    /// Build a recognition service over the given vision provider
    pub fn recognition_service(&self, provider: Box<dyn VisionProvider>) -> RecognitionService {
        RecognitionService::new(Arc::clone(&self.repository), provider, &self.larder_dir)
    }

    /// Resolve the currently logged-in user from config
    pub fn current_user(&self) -> Result<User> {
        let Some(username) = self.config.current_user.as_deref() else {
            bail!("not logged in (run 'larder login' first)");
        };
        match self.repository.get_user_by_username(username)? {
            Some(user) => Ok(user),
            None => bail!("logged-in user '{}' no longer exists", username),
        }
    }
}

//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod auth;
mod cooking;
mod demo;
pub mod logging;
pub mod migration;
mod pantry;
mod recipe;
mod recognition;
mod status;

pub use auth::{hash_password, verify_password, AuthService};
pub use cooking::{CookingHistoryEntry, CookingService};
pub use demo::{DemoService, DEMO_PASSWORD, DEMO_USERNAME};
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use pantry::PantryService;
pub use recipe::{RankedRecipe, RecipeService};
pub use recognition::{RecognitionOutcome, RecognitionService};
pub use status::{AnonymousSummary, StatusService, StatusSummary};

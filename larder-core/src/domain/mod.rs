//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod cooking;
mod pantry;
mod recipe;
mod recognition;
mod user;
pub mod result;
pub mod score;

pub use cooking::CookingLog;
pub use pantry::PantryItem;
pub use recipe::{IngredientRole, NutritionFacts, Recipe, RecipeIngredient};
pub use recognition::{RecognitionLog, RecognizedItem};
pub use score::RecipeScore;
pub use user::User;

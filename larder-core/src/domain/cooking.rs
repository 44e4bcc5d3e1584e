//! Cooking log domain model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A historical record that a user prepared a given recipe on a given date
///
/// Append-only: entries are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookingLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub cooked_on: NaiveDate,
}

impl CookingLog {
    pub fn new(id: Uuid, user_id: Uuid, recipe_id: Uuid, cooked_on: NaiveDate) -> Self {
        Self {
            id,
            user_id,
            recipe_id,
            cooked_on,
        }
    }
}

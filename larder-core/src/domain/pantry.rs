//! Pantry item domain model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};

/// A quantity of a named ingredient owned by a user, with optional expiry
///
/// Uniqueness invariant: (user_id, name). Upserting an item a user already
/// holds accumulates quantity rather than replacing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PantryItem {
    /// Create a new pantry item with required fields
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        name: impl Into<String>,
        quantity: i64,
        unit: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            name: name.into(),
            quantity,
            unit: unit.into(),
            expiry_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_expiry(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    /// Normalize an item name for (user, name) uniqueness checks
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_string()
    }

    /// Validate pantry item data
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("item name cannot be empty"));
        }
        if self.quantity < 0 {
            return Err(Error::validation("quantity cannot be negative"));
        }
        if self.unit.trim().is_empty() {
            return Err(Error::validation("unit cannot be empty"));
        }
        Ok(())
    }

    /// Whether the item expires on or before the given cutoff date
    pub fn expires_by(&self, cutoff: NaiveDate) -> bool {
        self.expiry_date.map(|d| d <= cutoff).unwrap_or(false)
    }
}

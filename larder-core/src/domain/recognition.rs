//! Ingredient recognition domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single ingredient detected in an image by a vision provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RecognizedItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            confidence: None,
        }
    }

    /// Round the detected quantity to a whole pantry count, at least 1
    pub fn pantry_quantity(&self) -> i64 {
        match self.quantity {
            Some(q) if q >= 1.0 => q.round() as i64,
            _ => 1,
        }
    }
}

/// A historical record of an ingredient-detection pass
///
/// Append-only; only the item count is kept, never the image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recognized_at: DateTime<Utc>,
    pub items_count: i64,
}

impl RecognitionLog {
    pub fn new(id: Uuid, user_id: Uuid, recognized_at: DateTime<Utc>, items_count: i64) -> Self {
        Self {
            id,
            user_id,
            recognized_at,
            items_count,
        }
    }
}

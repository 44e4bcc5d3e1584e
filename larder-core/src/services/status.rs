//! Status service - per-user activity summary

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;

/// Status service for activity summaries
pub struct StatusService {
    repository: Arc<DuckDbRepository>,
}

impl StatusService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Summary for a logged-in user
    ///
    /// `alert_window_days` is the expiry horizon for the expiring-soon count.
    pub fn get_status(
        &self,
        user_id: Uuid,
        username: &str,
        alert_window_days: i64,
    ) -> Result<StatusSummary> {
        let uid = user_id.to_string();
        let cutoff = Utc::now().date_naive() + Duration::days(alert_window_days);
        Ok(StatusSummary {
            username: username.to_string(),
            pantry_items: self.repository.get_pantry_item_count(&uid)?,
            expiring_soon: self.repository.get_expiring_items(&uid, cutoff)?.len() as i64,
            recipes: self.repository.get_recipe_count()?,
            cooking_logs: self.repository.get_cooking_log_count(&uid)?,
            distinct_recipes_cooked: self.repository.get_distinct_recipes_cooked(&uid)?,
            recognition_passes: self.repository.get_recognition_log_count(&uid)?,
        })
    }

    /// Summary when nobody is logged in
    pub fn get_anonymous_status(&self) -> Result<AnonymousSummary> {
        Ok(AnonymousSummary {
            users: self.repository.get_user_count()?,
            recipes: self.repository.get_recipe_count()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub username: String,
    pub pantry_items: i64,
    pub expiring_soon: i64,
    pub recipes: i64,
    pub cooking_logs: i64,
    pub distinct_recipes_cooked: i64,
    pub recognition_passes: i64,
}

#[derive(Debug, Serialize)]
pub struct AnonymousSummary {
    pub users: i64,
    pub recipes: i64,
}

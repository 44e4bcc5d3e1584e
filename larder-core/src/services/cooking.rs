//! Cooking service - history logging and range queries

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Error;
use crate::domain::CookingLog;

/// Cooking service
pub struct CookingService {
    repository: Arc<DuckDbRepository>,
}

/// A cooking log entry joined with its recipe title
#[derive(Debug, Serialize)]
pub struct CookingHistoryEntry {
    pub cooked_on: NaiveDate,
    pub recipe_id: Uuid,
    pub recipe_title: String,
}

impl CookingService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Record that the user cooked a recipe on a date
    pub fn log(&self, user_id: Uuid, recipe_id: Uuid, cooked_on: NaiveDate) -> Result<CookingLog> {
        if self
            .repository
            .get_recipe_by_id(&recipe_id.to_string())?
            .is_none()
        {
            return Err(Error::not_found("recipe").into());
        }

        let entry = CookingLog {
            id: Uuid::new_v4(),
            user_id,
            recipe_id,
            cooked_on,
        };
        self.repository.add_cooking_log(&entry)?;
        Ok(entry)
    }

    /// Cooking history within [start, end], oldest first, with titles
    pub fn history(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CookingHistoryEntry>> {
        if start > end {
            return Err(Error::validation("start date is after end date").into());
        }

        let logs = self
            .repository
            .get_cooking_logs_range(&user_id.to_string(), start, end)?;

        let mut entries = Vec::with_capacity(logs.len());
        for log in logs {
            let title = self
                .repository
                .get_recipe_by_id(&log.recipe_id.to_string())?
                .map(|r| r.title)
                .unwrap_or_else(|| "(deleted recipe)".to_string());
            entries.push(CookingHistoryEntry {
                cooked_on: log.cooked_on,
                recipe_id: log.recipe_id,
                recipe_title: title,
            });
        }
        Ok(entries)
    }

    /// Number of distinct recipes the user has ever cooked
    pub fn distinct_recipes_cooked(&self, user_id: Uuid) -> Result<i64> {
        self.repository
            .get_distinct_recipes_cooked(&user_id.to_string())
    }
}

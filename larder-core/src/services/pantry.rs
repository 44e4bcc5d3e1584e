//! Pantry service - item CRUD, expiry alerts, recognized-item intake

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Error;
use crate::domain::{PantryItem, RecognizedItem};

/// Pantry service
pub struct PantryService {
    repository: Arc<DuckDbRepository>,
}

impl PantryService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// List the user's pantry, newest first
    pub fn list(&self, user_id: Uuid) -> Result<Vec<PantryItem>> {
        self.repository.get_pantry_items(&user_id.to_string())
    }

    /// Add an item, accumulating quantity if the user already holds it
    pub fn add(
        &self,
        user_id: Uuid,
        name: &str,
        quantity: i64,
        unit: &str,
        expiry_date: Option<NaiveDate>,
    ) -> Result<PantryItem> {
        let name = PantryItem::normalize_name(name);
        let mut item = PantryItem::new(Uuid::new_v4(), user_id, name, quantity, unit);
        if let Some(d) = expiry_date {
            item = item.with_expiry(d);
        }
        item.validate()?;

        self.repository.upsert_pantry_item(&item)?;

        // The stored row may differ from `item` after an accumulate
        let stored = self
            .repository
            .get_pantry_items(&user_id.to_string())?
            .into_iter()
            .find(|i| i.name == item.name);
        Ok(stored.unwrap_or(item))
    }

    /// Replace an item's fields
    pub fn update(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        name: &str,
        quantity: i64,
        unit: &str,
        expiry_date: Option<NaiveDate>,
    ) -> Result<PantryItem> {
        let existing = self
            .repository
            .get_pantry_item_by_id(&user_id.to_string(), &item_id.to_string())?;
        let Some(mut item) = existing else {
            return Err(Error::not_found("pantry item").into());
        };

        item.name = PantryItem::normalize_name(name);
        item.quantity = quantity;
        item.unit = unit.to_string();
        item.expiry_date = expiry_date;
        item.validate()?;

        if !self.repository.update_pantry_item(&item)? {
            return Err(Error::not_found("pantry item").into());
        }
        Ok(item)
    }

    /// Delete an item owned by the user
    pub fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<()> {
        if !self
            .repository
            .delete_pantry_item(&user_id.to_string(), &item_id.to_string())?
        {
            return Err(Error::not_found("pantry item").into());
        }
        Ok(())
    }

    /// Items expiring within the given window from today, soonest first
    pub fn expiry_alerts(&self, user_id: Uuid, window_days: i64) -> Result<Vec<PantryItem>> {
        let cutoff = Utc::now().date_naive() + Duration::days(window_days);
        self.repository
            .get_expiring_items(&user_id.to_string(), cutoff)
    }

    /// Bulk-add recognized ingredients to the pantry
    ///
    /// Quantities are rounded to whole counts (minimum 1); no expiry is
    /// assumed for recognized items. Returns the number of items added.
    pub fn add_recognized(&self, user_id: Uuid, items: &[RecognizedItem]) -> Result<usize> {
        let mut added = 0;
        for rec in items {
            let name = PantryItem::normalize_name(&rec.name);
            if name.is_empty() {
                continue;
            }
            let canonical = self.repository.resolve_ingredient_name(&name)?;
            let item = PantryItem::new(
                Uuid::new_v4(),
                user_id,
                canonical,
                rec.pantry_quantity(),
                "pcs",
            );
            self.repository.upsert_pantry_item(&item)?;
            added += 1;
        }
        Ok(added)
    }
}

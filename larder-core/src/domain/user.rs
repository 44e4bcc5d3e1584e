//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};

/// A registered user
///
/// The password hash is an argon2id PHC string. It is never serialized
/// into JSON output; callers that need to show a user use `username`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Uuid, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }

    /// Normalize a username: trimmed, lowercased
    pub fn normalize_username(username: &str) -> String {
        username.trim().to_lowercase()
    }

    /// Validate user data
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::validation("username cannot be empty"));
        }
        if self.username.len() > 64 {
            return Err(Error::validation("username too long"));
        }
        Ok(())
    }
}

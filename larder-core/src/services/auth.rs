//! Auth service - registration and login
//!
//! Passwords are hashed with Argon2id and stored as PHC strings. Login
//! failures for unknown users and wrong passwords produce the same message
//! so usernames cannot be probed.

use std::sync::Arc;

use anyhow::{bail, Result};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::User;

const MIN_PASSWORD_LEN: usize = 8;

/// Auth service for user registration and login
pub struct AuthService {
    repository: Arc<DuckDbRepository>,
}

impl AuthService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Register a new user
    pub fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = User::normalize_username(username);
        if username.is_empty() {
            bail!("username cannot be empty");
        }
        if password.len() < MIN_PASSWORD_LEN {
            bail!("password must be at least {} characters", MIN_PASSWORD_LEN);
        }
        if self.repository.get_user_by_username(&username)?.is_some() {
            bail!("username '{}' is already taken", username);
        }

        let hash = hash_password(password)?;
        let user = User::new(Uuid::new_v4(), username, hash);
        user.validate()?;
        self.repository.create_user(&user)?;
        Ok(user)
    }

    /// Verify credentials and return the user
    ///
    /// Same error text for unknown user and wrong password.
    pub fn login(&self, username: &str, password: &str) -> Result<User> {
        let username = User::normalize_username(username);

        let user = match self.repository.get_user_by_username(&username)? {
            Some(u) => u,
            None => bail!("invalid username or password"),
        };

        if !verify_password(password, &user.password_hash) {
            bail!("invalid username or password");
        }

        Ok(user)
    }
}

/// Hash a password into an Argon2id PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string
pub fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

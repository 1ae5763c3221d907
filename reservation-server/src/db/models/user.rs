//! User Model

use super::serde_helpers;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use shared::models::{Role, UserProfile};
use surrealdb::RecordId;

pub const TABLE: &str = "user";

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub hash_pass: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: i64,
}

impl User {
    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Verify password against the stored hash
    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.hash_pass) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.to_string(),
            username: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::booking::UserStore;
use crate::db::models::user::TABLE;
use crate::db::models::{User, new_record_id};
use crate::utils::time::now_millis;
use async_trait::async_trait;
use shared::models::Role;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

pub const DUPLICATE_EMAIL: &str = "User already exists";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(id.clone()).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.trim().to_lowercase()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a user from an already hashed password
    ///
    /// Emails are stored lower-cased.
    pub async fn create(&self, name: &str, email: &str, hash_pass: String, role: Role) -> RepoResult<User> {
        if self.find_by_email(email).await?.is_some() {
            return Err(RepoError::Duplicate(DUPLICATE_EMAIL.to_string()));
        }

        let created: Vec<User> = self
            .base
            .db()
            .query(
                "CREATE $id SET name = $name, email = $email, hash_pass = $hash_pass, \
                 role = $role, created_at = $created_at",
            )
            .bind(("id", new_record_id(TABLE)))
            .bind(("name", name.trim().to_string()))
            .bind(("email", email.trim().to_lowercase()))
            .bind(("hash_pass", hash_pass))
            .bind(("role", role))
            .bind(("created_at", now_millis()))
            .await?
            .take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_user(&self, id: &RecordId) -> RepoResult<Option<User>> {
        self.find_by_id(id).await
    }
}

//! Repository Module
//!
//! CRUD over the embedded SurrealDB. Each repository also implements the
//! matching `booking` store trait so the resolver never sees the database.

pub mod dining_table;
pub mod reservation;
pub mod unit_of_work;
pub mod user;

// Re-exports
pub use dining_table::DiningTableRepository;
pub use reservation::ReservationRepository;
pub use unit_of_work::SurrealCommitter;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:key" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 新建: models::new_record_id("reservation")
//   - 解析: models::parse_record_id("dining_table", raw)
//   - 写入: 显式 CREATE/UPDATE ... SET 并 bind RecordId，避免序列化成字符串

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

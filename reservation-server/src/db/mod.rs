//! Database Module
//!
//! Embedded SurrealDB: RocksDB on disk in production, the in-memory engine
//! in tests. Schema (tables + unique indexes) is applied on every start.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "reservations";
const DATABASE: &str = "main";

const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
DEFINE INDEX IF NOT EXISTS dining_table_number ON TABLE dining_table FIELDS table_number UNIQUE;

DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE;

DEFINE TABLE IF NOT EXISTS reservation SCHEMALESS;
DEFINE INDEX IF NOT EXISTS reservation_reserved_at ON TABLE reservation FIELDS reserved_at;
DEFINE INDEX IF NOT EXISTS reservation_table ON TABLE reservation FIELDS table_id, reserved_at;
DEFINE INDEX IF NOT EXISTS reservation_user ON TABLE reservation FIELDS user_id;
"#;

/// Database service — owns the SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB store at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %db_path, "Database opened (SurrealDB RocksDB)");
        Self::prepare(db).await
    }

    /// Throw-away in-memory database
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }

    /// Round-trip to the engine (health checks)
    pub async fn ping(&self) -> Result<(), AppError> {
        self.db
            .health()
            .await
            .map_err(|e| AppError::database(format!("Database unhealthy: {e}")))
    }
}

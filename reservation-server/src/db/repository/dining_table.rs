//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::booking::TableStore;
use crate::db::models::dining_table::TABLE;
use crate::db::models::{DiningTable, new_record_id};
use crate::utils::time::now_millis;
use async_trait::async_trait;
use shared::models::{DiningTableCreate, DiningTableUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

pub const DUPLICATE_NUMBER: &str = "Table with the same number already exists";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All tables ordered by number
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY table_number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<DiningTable>> {
        let table: Option<DiningTable> = self.base.db().select(id.clone()).await?;
        Ok(table)
    }

    pub async fn find_by_number(&self, table_number: i32) -> RepoResult<Option<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE table_number = $table_number LIMIT 1")
            .bind(("table_number", table_number))
            .await?
            .take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new dining table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        if self.find_by_number(data.table_number).await?.is_some() {
            return Err(RepoError::Duplicate(DUPLICATE_NUMBER.to_string()));
        }

        let created: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "CREATE $id SET table_number = $table_number, capacity = $capacity, \
                 available = $available, reservations = [], created_at = $created_at",
            )
            .bind(("id", new_record_id(TABLE)))
            .bind(("table_number", data.table_number))
            .bind(("capacity", data.capacity))
            .bind(("available", data.available.unwrap_or(true)))
            .bind(("created_at", now_millis()))
            .await?
            .take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Partial update; the number stays unique
    pub async fn update(&self, id: &RecordId, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))?;

        if let Some(number) = data.table_number
            && number != existing.table_number
            && self.find_by_number(number).await?.is_some()
        {
            return Err(RepoError::Duplicate(DUPLICATE_NUMBER.to_string()));
        }

        let updated: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "UPDATE $id SET table_number = $table_number, capacity = $capacity, \
                 available = $available",
            )
            .bind(("id", id.clone()))
            .bind(("table_number", data.table_number.unwrap_or(existing.table_number)))
            .bind(("capacity", data.capacity.unwrap_or(existing.capacity)))
            .bind(("available", data.available.unwrap_or(existing.available)))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Hard delete a dining table
    pub async fn delete(&self, id: &RecordId) -> RepoResult<()> {
        let deleted: Option<DiningTable> = self.base.db().delete(id.clone()).await?;
        deleted
            .map(|_| ())
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Set `available` on every listed table, returns how many matched
    pub async fn set_availability(&self, ids: Vec<RecordId>, available: bool) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let updated: Vec<DiningTable> = self
            .base
            .db()
            .query("UPDATE dining_table SET available = $available WHERE id IN $ids")
            .bind(("available", available))
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(updated.len())
    }
}

#[async_trait]
impl TableStore for DiningTableRepository {
    async fn find_table(&self, id: &RecordId) -> RepoResult<Option<DiningTable>> {
        self.find_by_id(id).await
    }

    async fn candidate_tables(&self, min_capacity: i32, max_capacity: i32) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE available = true \
                 AND capacity >= $min AND capacity <= $max ORDER BY table_number",
            )
            .bind(("min", min_capacity))
            .bind(("max", max_capacity))
            .await?
            .take(0)?;
        Ok(tables)
    }
}

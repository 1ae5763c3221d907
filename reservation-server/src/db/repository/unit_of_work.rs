//! SurrealDB unit-of-work committer
//!
//! Ops run as separate statements in order. There is no engine transaction
//! around them: a failure after the first op leaves the earlier writes in
//! place and is reported through `CommitError::applied`.

use super::{BaseRepository, RepoError, RepoResult};
use crate::booking::{CommitError, UnitOfWork, WorkCommitter, WriteOp};
use crate::db::models::{DiningTable, Reservation};
use async_trait::async_trait;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct SurrealCommitter {
    base: BaseRepository,
}

impl SurrealCommitter {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn apply(&self, op: &WriteOp) -> RepoResult<()> {
        match op {
            WriteOp::InsertReservation(r) => self.write_reservation("CREATE", r).await,
            WriteOp::SaveReservation(r) => self.write_reservation("UPDATE", r).await,
            WriteOp::DeleteReservation(id) => {
                let deleted: Option<Reservation> = self.base.db().delete(id.clone()).await?;
                deleted
                    .map(|_| ())
                    .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
            }
            WriteOp::AttachToTable { table, reservation } => {
                self.touch_table(
                    "UPDATE $table SET reservations = array::union(reservations ?? [], [$reservation])",
                    table,
                    reservation,
                )
                .await
            }
            WriteOp::DetachFromTable { table, reservation } => {
                self.touch_table(
                    "UPDATE $table SET reservations = array::complement(reservations ?? [], [$reservation])",
                    table,
                    reservation,
                )
                .await
            }
        }
    }

    async fn write_reservation(&self, verb: &str, r: &Reservation) -> RepoResult<()> {
        let sql = format!(
            "{verb} $id SET table_id = $table_id, user_id = $user_id, reserved_at = $reserved_at, \
             guests = $guests, status = $status, created_at = $created_at"
        );
        let written: Vec<Reservation> = self
            .base
            .db()
            .query(sql)
            .bind(("id", r.id.clone()))
            .bind(("table_id", r.table_id.clone()))
            .bind(("user_id", r.user_id.clone()))
            .bind(("reserved_at", r.reserved_at))
            .bind(("guests", r.guests))
            .bind(("status", r.status))
            .bind(("created_at", r.created_at))
            .await?
            .take(0)?;
        if written.is_empty() {
            return Err(RepoError::NotFound(format!("Reservation {} not found", r.id)));
        }
        Ok(())
    }

    async fn touch_table(&self, sql: &'static str, table: &RecordId, reservation: &RecordId) -> RepoResult<()> {
        let updated: Vec<DiningTable> = self
            .base
            .db()
            .query(sql)
            .bind(("table", table.clone()))
            .bind(("reservation", reservation.clone()))
            .await?
            .take(0)?;
        if updated.is_empty() {
            return Err(RepoError::NotFound(format!("Dining table {} not found", table)));
        }
        Ok(())
    }
}

#[async_trait]
impl WorkCommitter for SurrealCommitter {
    async fn commit(&self, work: UnitOfWork) -> Result<(), CommitError> {
        for (applied, op) in work.ops().iter().enumerate() {
            if let Err(source) = self.apply(op).await {
                return Err(CommitError {
                    applied,
                    failed_op: op.to_string(),
                    source,
                });
            }
        }
        Ok(())
    }
}

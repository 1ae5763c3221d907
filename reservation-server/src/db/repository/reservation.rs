//! Reservation Repository
//!
//! Read side only. Reservation writes go through [`super::SurrealCommitter`]
//! so the table's reservation list moves with them.

use super::{BaseRepository, RepoResult};
use crate::booking::ReservationStore;
use crate::db::models::Reservation;
use async_trait::async_trait;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Reservation>> {
        let reservation: Option<Reservation> = self.base.db().select(id.clone()).await?;
        Ok(reservation)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query("SELECT * FROM reservation ORDER BY reserved_at")
            .await?
            .take(0)?;
        Ok(reservations)
    }

    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query("SELECT * FROM reservation WHERE user_id = $user ORDER BY reserved_at")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Reservations with `start <= reserved_at < end`, earliest first
    pub async fn find_between(&self, start: i64, end: i64) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation WHERE reserved_at >= $start AND reserved_at < $end \
                 ORDER BY reserved_at",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    pub async fn find_at(&self, table: &RecordId, instant: i64) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query("SELECT * FROM reservation WHERE table_id = $table AND reserved_at = $instant")
            .bind(("table", table.clone()))
            .bind(("instant", instant))
            .await?
            .take(0)?;
        Ok(reservations)
    }
}

#[async_trait]
impl ReservationStore for ReservationRepository {
    async fn find_reservation(&self, id: &RecordId) -> RepoResult<Option<Reservation>> {
        self.find_by_id(id).await
    }

    async fn reservations_between(&self, start: i64, end: i64) -> RepoResult<Vec<Reservation>> {
        self.find_between(start, end).await
    }

    async fn reservations_at(&self, table: &RecordId, instant: i64) -> RepoResult<Vec<Reservation>> {
        self.find_at(table, instant).await
    }

    async fn all_reservations(&self) -> RepoResult<Vec<Reservation>> {
        self.find_all().await
    }

    async fn reservations_of_user(&self, user: &RecordId) -> RepoResult<Vec<Reservation>> {
        self.find_by_user(user).await
    }
}

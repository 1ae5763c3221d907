//! Store seams the resolver reads through
//!
//! Implemented by the SurrealDB repositories and by [`super::memory::MemoryStore`].

use crate::db::models::{DiningTable, Reservation, User};
use crate::db::repository::RepoResult;
use async_trait::async_trait;
use surrealdb::RecordId;

#[async_trait]
pub trait TableStore: Send + Sync {
    async fn find_table(&self, id: &RecordId) -> RepoResult<Option<DiningTable>>;

    /// Tables with `available = true` and `min_capacity <= capacity <= max_capacity`
    async fn candidate_tables(&self, min_capacity: i32, max_capacity: i32) -> RepoResult<Vec<DiningTable>>;
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn find_reservation(&self, id: &RecordId) -> RepoResult<Option<Reservation>>;

    /// Reservations with `start <= reserved_at < end`
    async fn reservations_between(&self, start: i64, end: i64) -> RepoResult<Vec<Reservation>>;

    /// Reservations on `table` at exactly `instant`, whatever their status
    async fn reservations_at(&self, table: &RecordId, instant: i64) -> RepoResult<Vec<Reservation>>;

    async fn all_reservations(&self) -> RepoResult<Vec<Reservation>>;

    async fn reservations_of_user(&self, user: &RecordId) -> RepoResult<Vec<Reservation>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: &RecordId) -> RepoResult<Option<User>>;
}

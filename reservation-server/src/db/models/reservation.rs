//! Reservation Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::ReservationStatus;
use surrealdb::RecordId;

pub const TABLE: &str = "reservation";

/// Reservation entity
///
/// `reserved_at` is the requested instant in Unix millis. Two reservations
/// conflict only when they name the same table and the exact same instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub table_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub user_id: RecordId,
    pub reserved_at: i64,
    pub guests: i32,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default)]
    pub created_at: i64,
}

impl Reservation {
    pub fn is_owned_by(&self, user: &RecordId) -> bool {
        &self.user_id == user
    }

    pub fn blocks(&self, table: &RecordId, instant: i64) -> bool {
        self.status.holds_table() && &self.table_id == table && self.reserved_at == instant
    }
}

//! Dining Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub const TABLE: &str = "dining_table";

/// Dining table entity (桌台)
///
/// `reservations` lists the reservations currently holding the table. It is
/// only ever changed through a unit of work together with the reservation
/// record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub table_number: i32,
    pub capacity: i32,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub available: bool,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub reservations: Vec<RecordId>,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl DiningTable {
    /// Whether the table can seat `guests` right now
    pub fn can_seat(&self, guests: i32) -> bool {
        self.available && self.capacity >= guests
    }
}

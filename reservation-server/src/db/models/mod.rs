//! Database Models
//!
//! Persisted entities. Ids are generated by the server (see
//! [`new_record_id`]) so a unit of work can reference a record before it
//! exists.

pub mod serde_helpers;

pub mod dining_table;
pub mod reservation;
pub mod user;

pub use dining_table::DiningTable;
pub use reservation::Reservation;
pub use user::User;

use surrealdb::RecordId;

/// Fresh random record id in `table`
pub fn new_record_id(table: &str) -> RecordId {
    RecordId::from_table_key(table, uuid::Uuid::new_v4().simple().to_string())
}

/// Parse a client supplied id for `table`
///
/// Accepts both `"table:key"` and a bare key. Returns `None` for ids that
/// are malformed or that point at another table.
pub fn parse_record_id(table: &str, raw: &str) -> Option<RecordId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.contains(':') {
        let id = raw.parse::<RecordId>().ok()?;
        (id.table() == table).then_some(id)
    } else {
        Some(RecordId::from_table_key(table, raw))
    }
}

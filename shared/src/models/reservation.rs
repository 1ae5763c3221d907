//! Reservation Model

use serde::{Deserialize, Serialize};

/// Reservation lifecycle
///
/// New reservations start as `pending`. Cancelled reservations stay on
/// record but no longer hold their table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// Whether a reservation in this state blocks its table
    pub fn holds_table(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    /// Table record id (`"dining_table:..."`)
    pub table_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` or `HH:MM:SS`
    pub time: String,
    pub guests: i32,
}

/// Update reservation payload, every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub table_id: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub guests: Option<i32>,
}

/// Inclusive day range used by the admin endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

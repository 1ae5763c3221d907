//! Dining Table Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(range(min = 1, message = "Table number must be positive"))]
    pub table_number: i32,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: i32,
    /// Defaults to `true`
    pub available: Option<bool>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DiningTableUpdate {
    #[validate(range(min = 1, message = "Table number must be positive"))]
    pub table_number: Option<i32>,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: Option<i32>,
    pub available: Option<bool>,
}

/// Query for `GET /api/tables/available`
///
/// All three fields are required; they are optional here so that a missing
/// one is reported as a validation error instead of a query rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// Calendar day, `YYYY-MM-DD`
    pub date: Option<String>,
    /// Time of day, `HH:MM` or `HH:MM:SS`
    pub time: Option<String>,
    pub party_size: Option<i32>,
}

/// Toggle `available` on many tables at once (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAvailabilityUpdate {
    pub table_ids: Vec<String>,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateResult {
    pub message: String,
    pub modified_count: usize,
}

//! Admin report payloads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Admin dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_tables: usize,
    pub total_reservations: usize,
    pub available_tables: usize,
    /// Reservations whose instant falls on the current business day
    pub today_reservations: usize,
}

/// Per-day occupancy figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyOccupancy {
    pub total_reservations: usize,
    pub total_guests: i64,
    /// reservations / total tables * 100
    pub occupancy_rate: f64,
}

/// Occupancy keyed by business day (`YYYY-MM-DD`), in day order
pub type OccupancyReport = BTreeMap<String, DailyOccupancy>;

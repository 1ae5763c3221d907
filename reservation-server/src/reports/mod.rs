//! Admin reports
//!
//! Pure aggregation over already loaded records; the admin handlers do the
//! fetching. Day keys are `YYYY-MM-DD` in the business timezone.

use chrono_tz::Tz;
use shared::models::{DailyOccupancy, DashboardStats, OccupancyReport};

use crate::booking::instant::DayWindow;
use crate::db::models::{DiningTable, Reservation};
use crate::utils::time::millis_to_local_date;

/// Counters for the admin dashboard
///
/// `today` is the business day window; every reservation in it counts,
/// whatever its status.
pub fn dashboard_stats(tables: &[DiningTable], reservations: &[Reservation], today: DayWindow) -> DashboardStats {
    DashboardStats {
        total_tables: tables.len(),
        total_reservations: reservations.len(),
        available_tables: tables.iter().filter(|t| t.available).count(),
        today_reservations: reservations
            .iter()
            .filter(|r| today.contains(r.reserved_at))
            .count(),
    }
}

/// Per-day reservation count, guest total and occupancy rate
///
/// Rate is `reservations / total_tables * 100`, or 0 without tables. Days
/// with no reservations are absent from the map.
pub fn occupancy_report(reservations: &[Reservation], total_tables: usize, tz: Tz) -> OccupancyReport {
    let mut report = OccupancyReport::new();

    for r in reservations {
        let key = millis_to_local_date(r.reserved_at, tz).format("%Y-%m-%d").to_string();
        let day = report.entry(key).or_insert(DailyOccupancy {
            total_reservations: 0,
            total_guests: 0,
            occupancy_rate: 0.0,
        });
        day.total_reservations += 1;
        day.total_guests += i64::from(r.guests);
    }

    for day in report.values_mut() {
        day.occupancy_rate = if total_tables == 0 {
            0.0
        } else {
            day.total_reservations as f64 / total_tables as f64 * 100.0
        };
    }

    report
}

/// Reservations ordered by instant, earliest first
pub fn sort_by_instant(mut reservations: Vec<Reservation>) -> Vec<Reservation> {
    reservations.sort_by_key(|r| r.reserved_at);
    reservations
}

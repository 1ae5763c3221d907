//! Admin API Handlers
//!
//! 报表按业务时区划分自然日，区间 `[start_date, end_date]` 两端都包含。

use axum::{
    Json,
    extract::{Query, State},
};

use crate::booking::instant::DayWindow;
use crate::core::ServerState;
use crate::db::models::{Reservation, dining_table, parse_record_id};
use crate::reports;
use crate::utils::time::{parse_day_range, today};
use crate::utils::{AppError, AppResult};
use shared::models::{
    BulkAvailabilityUpdate, BulkUpdateResult, DashboardStats, DateRangeQuery, OccupancyReport,
};

/// 读取必填的日期区间并转换为 `[start, end)` 毫秒
fn required_range(state: &ServerState, query: &DateRangeQuery) -> AppResult<(i64, i64)> {
    let (Some(start), Some(end)) = (query.start_date.as_deref(), query.end_date.as_deref()) else {
        return Err(AppError::validation("start_date and end_date are required"));
    };
    let (_, _, start_ms, end_ms) = parse_day_range(start, end, state.timezone())?;
    Ok((start_ms, end_ms))
}

/// GET /api/admin/dashboard
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    let tz = state.timezone();
    let tables = state.tables().find_all().await?;
    let reservations = state.reservations().find_all().await?;
    let window = DayWindow::of_date(today(tz), tz);

    Ok(Json(reports::dashboard_stats(&tables, &reservations, window)))
}

/// GET /api/admin/occupancy-report?start_date&end_date
pub async fn occupancy_report(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<OccupancyReport>> {
    let (start, end) = required_range(&state, &query)?;
    let reservations = state.reservations().find_between(start, end).await?;
    let total_tables = state.tables().find_all().await?.len();

    Ok(Json(reports::occupancy_report(
        &reservations,
        total_tables,
        state.timezone(),
    )))
}

/// GET /api/admin/reservations?start_date&end_date - 按时刻升序
pub async fn reservations_in_range(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let (start, end) = required_range(&state, &query)?;
    let reservations = state.reservations().find_between(start, end).await?;
    Ok(Json(reports::sort_by_instant(reservations)))
}

/// POST /api/admin/tables/bulk-update
pub async fn bulk_update_tables(
    State(state): State<ServerState>,
    Json(payload): Json<BulkAvailabilityUpdate>,
) -> AppResult<Json<BulkUpdateResult>> {
    let ids = payload
        .table_ids
        .iter()
        .map(|raw| {
            parse_record_id(dining_table::TABLE, raw).ok_or_else(|| {
                AppError::validation("Invalid table id").with_detail("table_id", raw.clone())
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let modified_count = state
        .tables()
        .set_availability(ids, payload.available)
        .await?;

    tracing::info!(
        modified_count,
        available = payload.available,
        "Bulk table availability update"
    );

    Ok(Json(BulkUpdateResult {
        message: "Tables updated successfully".to_string(),
        modified_count,
    }))
}

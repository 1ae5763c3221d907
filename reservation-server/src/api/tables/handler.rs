//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use surrealdb::RecordId;

use crate::core::ServerState;
use crate::db::models::{DiningTable, dining_table, parse_record_id};
use crate::db::repository::RepoError;
use crate::utils::validation::validate_payload;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{AvailabilityQuery, DiningTableCreate, DiningTableUpdate};

fn table_id(raw: &str) -> AppResult<RecordId> {
    parse_record_id(dining_table::TABLE, raw).ok_or_else(|| AppError::new(ErrorCode::TableNotFound))
}

/// 桌号冲突与缺失映射到桌台专用错误码
fn table_error(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::TableNumberExists),
        RepoError::NotFound(_) => AppError::new(ErrorCode::TableNotFound),
        other => other.into(),
    }
}

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.tables().find_all().await?;
    Ok(Json(tables))
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let id = table_id(&id)?;
    let table = state
        .tables()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;
    Ok(Json(table))
}

/// GET /api/tables/available?date&time&party_size
pub async fn available(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.resolver.find_available_tables(&query).await?;
    Ok(Json(tables))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<(StatusCode, Json<DiningTable>)> {
    validate_payload(&payload)?;
    let table = state.tables().create(payload).await.map_err(table_error)?;

    tracing::info!(table_id = %table.id, table_number = table.table_number, "Dining table created");
    Ok((StatusCode::CREATED, Json(table)))
}

/// PUT /api/tables/{id} - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let id = table_id(&id)?;
    validate_payload(&payload)?;
    let table = state.tables().update(&id, payload).await.map_err(table_error)?;
    Ok(Json(table))
}

/// DELETE /api/tables/{id} - 删除桌台
///
/// 仍有预订引用的桌台不能删除。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = table_id(&id)?;
    let repo = state.tables();
    let table = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;

    if !table.reservations.is_empty() {
        return Err(AppError::new(ErrorCode::TableHasReservations)
            .with_detail("reservations", table.reservations.len()));
    }

    repo.delete(&id).await.map_err(table_error)?;

    tracing::info!(table_id = %id, "Dining table deleted");
    Ok(ApiResponse::message("Table deleted successfully"))
}

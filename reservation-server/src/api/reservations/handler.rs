//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::booking::ReservationReceipt;
use crate::core::ServerState;
use crate::db::models::{Reservation, parse_record_id, reservation};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{ReservationCreate, ReservationUpdate};

/// 格式错误的 id 与不存在的 id 一样处理
fn reservation_id(raw: &str) -> AppResult<RecordId> {
    parse_record_id(reservation::TABLE, raw)
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))
}

/// POST /api/reservations - 为当前用户创建预订
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<ReservationReceipt>)> {
    let receipt = state.resolver.create_reservation(&user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /api/reservations - 全部预订 (管理员)
pub async fn list_all(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state.resolver.list_reservations(&user.requester()).await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/my
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state
        .resolver
        .list_user_reservations(&user.requester())
        .await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let id = reservation_id(&id)?;
    let found = state.resolver.get_reservation(&user.requester(), &id).await?;
    Ok(Json(found))
}

/// PUT /api/reservations/{id} - 仅预订人可修改
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    let id = reservation_id(&id)?;
    let updated = state
        .resolver
        .update_reservation(&user.requester(), &id, &payload)
        .await?;
    Ok(Json(updated))
}

/// DELETE /api/reservations/{id}
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = reservation_id(&id)?;
    state.resolver.delete_reservation(&user.requester(), &id).await?;
    Ok(ApiResponse::message("Reservation deleted successfully"))
}

/// POST /api/reservations/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let id = reservation_id(&id)?;
    let cancelled = state.resolver.cancel_reservation(&user.requester(), &id).await?;
    Ok(Json(cancelled))
}

/// POST /api/reservations/{id}/confirm - 管理员确认
pub async fn confirm(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let id = reservation_id(&id)?;
    let confirmed = state
        .resolver
        .confirm_reservation(&user.requester(), &id)
        .await?;
    Ok(Json(confirmed))
}

//! HTTP API 模块
//!
//! # 路由结构
//!
//! | 前缀 | 认证 | 说明 |
//! |------|------|------|
//! | /health, /ready, /live | 无 | 健康检查 |
//! | /api/users | 部分 | 注册、登录、个人资料 |
//! | /api/tables | 写操作需管理员 | 桌台与可用性查询 |
//! | /api/reservations | 登录 | 预订 |
//! | /api/admin | 管理员 | 仪表盘、报表、批量操作 |
//!
//! 认证按路由挂载 (`route_layer`)，未匹配的路径返回 JSON 404。

pub mod admin;
pub mod health;
pub mod reservations;
pub mod tables;
pub mod users;

use std::time::Duration;

use axum::{Router, middleware};
use http::{HeaderValue, header};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// HTTP 访问日志
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        "{} {} {} {}ms",
        method,
        uri,
        response.status(),
        started.elapsed().as_millis()
    );

    response
}

async fn route_not_found() -> AppError {
    AppError::with_message(ErrorCode::NotFound, "Route not found")
}

/// Build the application router with state and the tower middleware stack
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    let cors = if state.config.is_development() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::<ServerState>::new()
        .merge(health::router())
        .merge(users::router(state.clone()))
        .merge(tables::router(state.clone()))
        .merge(reservations::router(state.clone()))
        .merge(admin::router(state.clone()))
        .fallback(route_not_found)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}

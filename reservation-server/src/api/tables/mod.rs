//! Dining Table API 模块
//!
//! 读取与可用性查询公开，增删改需要 `ManageTables`。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::policy::Action;
use crate::auth::{require_action, require_auth};
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/tables", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/available", get(handler::available))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route_layer(middleware::from_fn(require_action(Action::ManageTables)))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    read_routes.merge(manage_routes)
}

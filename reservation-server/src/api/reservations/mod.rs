//! Reservation API 模块
//!
//! 所有路由需要登录；归属与角色检查由预订解析器通过授权策略完成。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list_all))
        .route("/my", get(handler::list_mine))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/confirm", post(handler::confirm))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

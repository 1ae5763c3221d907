//! User API 模块
//!
//! 注册、登录为公共路由；`/profile` 需要登录。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/users", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    let public = Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/logout", get(handler::logout));

    let protected = Router::new()
        .route("/profile", get(handler::profile))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

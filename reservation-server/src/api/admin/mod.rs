//! Admin API 模块
//!
//! | 路径 | 方法 | 动作 |
//! |------|------|------|
//! | /api/admin/dashboard | GET | ViewReports |
//! | /api/admin/occupancy-report | GET | ViewReports |
//! | /api/admin/reservations | GET | ViewReports |
//! | /api/admin/tables/bulk-update | POST | ManageTables |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::policy::Action;
use crate::auth::{require_action, require_auth};
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/admin", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    let reports = Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route("/occupancy-report", get(handler::occupancy_report))
        .route("/reservations", get(handler::reservations_in_range))
        .route_layer(middleware::from_fn(require_action(Action::ViewReports)));

    let manage = Router::new()
        .route("/tables/bulk-update", post(handler::bulk_update_tables))
        .route_layer(middleware::from_fn(require_action(Action::ManageTables)));

    reports
        .merge(manage)
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

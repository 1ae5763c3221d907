//! 认证中间件
//!
//! 挂在受保护的路由上 (`route_layer`)，公开路由不经过这里。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::extractor::authenticate;
use crate::auth::CurrentUser;
use crate::auth::policy::{Action, Decision, Resource, authorize};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// 认证中间件 - 要求用户登录
///
/// 令牌取自 `Authorization: Bearer <token>` 或 `token` cookie。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// | 错误 | 错误码 |
/// |------|--------|
/// | 无令牌 | 1001 NotAuthenticated |
/// | 令牌过期 | 1003 TokenExpired |
/// | 无效令牌 | 1004 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS 预检
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let user = authenticate(&state.jwt_service, req.headers(), req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 动作检查中间件 - 必须在 [`require_auth`] 之后
///
/// 对系统级动作 (桌台管理、报表、全部预订) 询问 [`authorize`]。
///
/// ```ignore
/// Router::new()
///     .route("/dashboard", get(handler::dashboard))
///     .route_layer(middleware::from_fn(require_action(Action::ViewReports)))
///     .route_layer(middleware::from_fn_with_state(state, require_auth));
/// ```
pub fn require_action(
    action: Action,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;

            if let Decision::Deny(_) = authorize(&user.requester(), &Resource::System, action) {
                security_log!(
                    "WARN",
                    "action_denied",
                    user_id = user.id.to_string(),
                    action = action.as_str(),
                    uri = req.uri().to_string()
                );
                return Err(AppError::with_message(
                    ErrorCode::AdminRequired,
                    action.denied_message(),
                ));
            }

            Ok(next.run(req).await)
        })
    }
}

//! User Handlers
//!
//! 注册、登录、登出与个人资料。令牌同时放在响应体和 `token` cookie 中。

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::auth::{CurrentUser, TOKEN_COOKIE};
use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::RepoError;
use crate::security_log;
use crate::utils::validation::validate_payload;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role, UserProfile,
};

/// `Set-Cookie` value carrying the session token
pub fn token_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        TOKEN_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session token
pub fn clear_token_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", TOKEN_COOKIE)
}

fn issue_token(state: &ServerState, user: &User) -> AppResult<(String, String)> {
    let jwt = &state.jwt_service;
    let token = jwt.generate_token(&user.id, &user.name, user.role)?;
    let cookie = token_cookie(
        &token,
        jwt.expiration_seconds(),
        state.config.is_production(),
    );
    Ok((token, cookie))
}

/// POST /api/users/register - 注册 (默认 client 角色)
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    validate_payload(&req)?;

    let email = req.email.trim().to_lowercase();
    let role = req.role.unwrap_or(Role::Client);
    let hash_pass = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let user = state
        .users()
        .create(req.name.trim(), &email, hash_pass, role)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailAlreadyExists),
            other => other.into(),
        })?;

    let (token, cookie) = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    let body = RegisterResponse {
        id: user.id.to_string(),
        username: user.name,
        email: user.email,
        role: user.role,
        redirect_to: user.role.landing_path().to_string(),
        token,
    };
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(body),
    ))
}

/// POST /api/users/login
///
/// 未知邮箱与错误密码返回同一个错误，避免枚举账号。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = req.email.trim().to_lowercase();
    let user = state.users().find_by_email(&email).await?;

    let user = match user {
        Some(u) if u.verify_password(&req.password) => u,
        found => {
            let reason = if found.is_some() {
                "invalid_password"
            } else {
                "user_not_found"
            };
            security_log!("WARN", "login_failed", email = email.as_str(), reason = reason);
            return Err(AppError::invalid_credentials());
        }
    };

    let (token, cookie) = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    let body = LoginResponse {
        message: "Login successful".to_string(),
        role: user.role,
        redirect_to: user.role.landing_path().to_string(),
        token,
    };
    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}

/// GET /api/users/logout - 清除 cookie
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_token_cookie())],
        ApiResponse::message("Logged out"),
    )
}

/// GET /api/users/profile
pub async fn profile(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let user = state
        .users()
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user.profile()))
}

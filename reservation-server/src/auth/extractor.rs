//! JWT Extractor
//!
//! `CurrentUser` as a handler argument. Reuses the user injected by
//! [`super::require_auth`] when present, otherwise validates the token itself.

use axum::extract::FromRequestParts;
use http::HeaderMap;
use http::request::Parts;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Session cookie set on login/register
pub const TOKEN_COOKIE: &str = "token";

/// Token from `Authorization: Bearer ...`, falling back to the `token` cookie
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    if let Some(header) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        return JwtService::extract_from_header(header);
    }

    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Validate the token in `headers` and build the user context
pub(crate) fn authenticate(jwt: &JwtService, headers: &HeaderMap, uri: &http::Uri) -> Result<CurrentUser, AppError> {
    let Some(token) = token_from_headers(headers) else {
        security_log!("WARN", "auth_missing", uri = uri.to_string());
        return Err(AppError::not_authenticated());
    };

    match jwt.validate_token(token).and_then(CurrentUser::try_from) {
        Ok(user) => Ok(user),
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = uri.to_string()
            );
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Token is not valid")),
            }
        }
    }
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = authenticate(&state.jwt_service, &parts.headers, &parts.uri)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

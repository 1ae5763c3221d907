//! 统一错误处理
//!
//! 错误类型本身定义在 `shared::error`，这里只负责把各层错误转换成
//! [`AppError`]，让 handler 可以直接用 `?`。
//!
//! | 来源 | 转换 |
//! |------|------|
//! | [`RepoError`] | NotFound / AlreadyExists / DatabaseError / ValidationFailed |
//! | [`BookingError`] | 按冲突类型映射到 4xxx / 7xxx，越权到 2xxx |
//! | [`JwtError`] | TokenExpired / TokenInvalid / InternalError |
//! | [`TimeError`] | ValidationFailed |

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::auth::JwtError;
use crate::auth::policy::DenyReason;
use crate::booking::{BookingError, Conflict, Entity};
use crate::db::repository::RepoError;
use crate::utils::time::TimeError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::Validation(msg) => AppError::validation(msg),
            BookingError::NotFound(entity) => {
                let code = match entity {
                    Entity::User => ErrorCode::UserNotFound,
                    Entity::Table => ErrorCode::TableNotFound,
                    Entity::Reservation => ErrorCode::ReservationNotFound,
                };
                AppError::with_message(code, message)
            }
            BookingError::Conflict(conflict) => {
                let code = match conflict {
                    Conflict::TableUnavailable => ErrorCode::TableUnavailable,
                    Conflict::AlreadyReserved => ErrorCode::TableAlreadyReserved,
                    Conflict::AlreadyCancelled => ErrorCode::ReservationAlreadyCancelled,
                    Conflict::InvalidTransition => ErrorCode::ReservationStatusInvalid,
                };
                AppError::with_message(code, message)
            }
            BookingError::Forbidden { reason, .. } => {
                let code = match reason {
                    DenyReason::NotOwner => ErrorCode::NotReservationOwner,
                    DenyReason::AdminRequired => ErrorCode::AdminRequired,
                };
                AppError::with_message(code, message)
            }
            BookingError::Store(repo) => AppError::from(repo),
            BookingError::Inconsistent(commit) => {
                AppError::new(ErrorCode::DataInconsistent).with_detail("failed_op", commit.failed_op)
            }
        }
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => AppError::token_expired(),
            JwtError::InvalidToken(_) | JwtError::InvalidSignature => {
                AppError::new(ErrorCode::TokenInvalid)
            }
            JwtError::GenerationFailed(msg) | JwtError::ConfigError(msg) => AppError::internal(msg),
        }
    }
}

impl From<TimeError> for AppError {
    fn from(err: TimeError) -> Self {
        AppError::validation(err.to_string())
    }
}

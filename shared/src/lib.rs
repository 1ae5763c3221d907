//! Shared types for the reservation service
//!
//! Error codes, the unified API response envelope and the request/response
//! payloads exchanged between the server and its clients.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};

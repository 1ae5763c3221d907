//! 工具模块
//!
//! - [`AppError`] / [`ApiResponse`] - 统一错误与响应 (from shared::error)
//! - [`logger`] - tracing 初始化
//! - [`time`] - 日期/时间解析, 营业时区换算
//! - [`validation`] - 请求体校验

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

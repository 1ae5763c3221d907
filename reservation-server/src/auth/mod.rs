//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] / [`require_action`] - 中间件
//! - [`policy`] - 角色与归属规则

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod policy;

pub use extractor::TOKEN_COOKIE;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_action, require_auth};

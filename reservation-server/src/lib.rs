//! Reservation Server - 餐厅桌台预订服务
//!
//! # 架构概述
//!
//! - **预订** (`booking`): 可用性解析器，桌台/预订的一致性维护
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2，授权策略集中在 `auth::policy`
//! - **通知** (`notify`): 预订确认邮件 (AWS SES)
//! - **报表** (`reports`): 仪表盘与入座率统计
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! reservation-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、授权策略、中间件
//! ├── booking/       # 可用性解析器、工作单元
//! ├── notify/        # 通知发送
//! ├── reports/       # 报表聚合
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误映射、日志、时间、校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod booking;
pub mod core;
pub mod db;
pub mod notify;
pub mod reports;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use booking::{AvailabilityResolver, BookingError};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 `.env`、读取配置并初始化日志
///
/// 文件日志写入 `WORK_DIR/logs`，级别与格式取自 [`Config`]。
pub fn setup_environment() -> Result<Config, crate::core::ServerError> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    let log_dir = std::path::Path::new(&config.work_dir).join("logs");
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        log_dir.to_str(),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
  ____                                 _   _
 |  _ \ ___  ___  ___ _ ____   ____ _| |_(_) ___  _ __  ___
 | |_) / _ \/ __|/ _ \ '__\ \ / / _` | __| |/ _ \| '_ \/ __|
 |  _ <  __/\__ \  __/ |   \ V / (_| | |_| | (_) | | | \__ \
 |_| \_\___||___/\___|_|    \_/ \__,_|\__|_|\___/|_| |_|___/
    "#
    );
}

use chrono_tz::Tz;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 数据库与日志目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | BUSINESS_TIMEZONE | UTC | 营业时区 (IANA) |
/// | JWT_SECRET | 开发环境自动生成 | HS256 密钥 |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
/// | SES_FROM_EMAIL | - | 设置后启用 SES 邮件通知 |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | - | 启动时创建管理员 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    /// 营业时区，决定 "当天" 的边界
    pub timezone: Tz,
    pub jwt: JwtConfig,
    /// 发件地址，None 时只写日志
    pub ses_from_email: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值；时区或 JWT 配置非法时返回错误。
    pub fn from_env() -> Result<Self, ServerError> {
        let timezone = parse_timezone(&env_or("BUSINESS_TIMEZONE", "UTC"))?;
        let jwt = JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            work_dir: env_or("WORK_DIR", "./data"),
            http_port: env_parse("HTTP_PORT", 3000),
            environment: env_or("ENVIRONMENT", "development"),
            log_level: env_or("LOG_LEVEL", "info"),
            log_json: env_parse("LOG_JSON", false),
            timezone,
            jwt,
            ses_from_email: env_opt("SES_FROM_EMAIL"),
            admin_email: env_opt("ADMIN_EMAIL"),
            admin_password: env_opt("ADMIN_PASSWORD"),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
        })
    }

    /// 测试用配置: 固定密钥, 无外部依赖
    pub fn for_tests(timezone: Tz) -> Self {
        Self {
            work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
            http_port: 0,
            environment: "development".to_string(),
            log_level: "warn".to_string(),
            log_json: false,
            timezone,
            jwt: JwtConfig::with_secret("reservation-test-secret-0123456789abcdef"),
            ses_from_email: None,
            admin_email: None,
            admin_password: None,
            request_timeout_ms: 30000,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, ServerError> {
    name.parse::<Tz>()
        .map_err(|_| ServerError::Config(format!("Unknown timezone: {name}")))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

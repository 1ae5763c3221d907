use std::path::PathBuf;
use std::sync::Arc;

use shared::models::Role;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::booking::{AvailabilityResolver, BookingContext};
use crate::core::{Config, ServerError};
use crate::db::DbService;
use crate::db::models::User;
use crate::db::repository::{
    DiningTableRepository, ReservationRepository, SurrealCommitter, UserRepository,
};
use crate::notify::{LogNotifier, Notifier, SesNotifier};

/// 服务器状态 - 持有所有服务的共享引用
///
/// Clone 是浅拷贝 (Surreal 句柄和 Arc)。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 |
/// | jwt_service | JWT 认证服务 |
/// | resolver | 可用性解析 + 预订写入 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub resolver: AvailabilityResolver,
}

impl ServerState {
    /// 手动构造 (测试里配合内存数据库使用)
    pub fn new(config: Config, db: Surreal<Db>, notifier: Arc<dyn Notifier>) -> Self {
        let ctx = BookingContext {
            tables: Arc::new(DiningTableRepository::new(db.clone())),
            reservations: Arc::new(ReservationRepository::new(db.clone())),
            users: Arc::new(UserRepository::new(db.clone())),
            committer: Arc::new(SurrealCommitter::new(db.clone())),
            notifier,
            tz: config.timezone,
        };
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            db,
            jwt_service,
            resolver: AvailabilityResolver::new(ctx),
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 打开 `work_dir/reservations.db`
    /// 2. 选择通知方式 (SES 或日志)
    /// 3. 按需创建管理员账号
    pub async fn initialize(config: &Config) -> Result<Self, ServerError> {
        let work_dir = PathBuf::from(&config.work_dir);
        std::fs::create_dir_all(&work_dir)
            .map_err(|e| ServerError::Config(format!("Cannot create work dir {}: {e}", work_dir.display())))?;

        let db_path = work_dir.join("reservations.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?.db;

        let notifier: Arc<dyn Notifier> = match &config.ses_from_email {
            Some(from) => {
                tracing::info!(from = %from, "E-mail confirmations enabled (SES)");
                Arc::new(SesNotifier::from_env(from.clone(), config.timezone).await)
            }
            None => {
                tracing::info!("SES_FROM_EMAIL not set, confirmations are only logged");
                Arc::new(LogNotifier)
            }
        };

        let state = Self::new(config.clone(), db, notifier);
        state.bootstrap_admin().await?;
        Ok(state)
    }

    /// Create the `ADMIN_EMAIL` account if it does not exist yet
    pub async fn bootstrap_admin(&self) -> Result<Option<User>, ServerError> {
        let (Some(email), Some(password)) = (&self.config.admin_email, &self.config.admin_password) else {
            return Ok(None);
        };

        let users = self.users();
        if users.find_by_email(email).await.map_err(crate::utils::AppError::from)?.is_some() {
            return Ok(None);
        }

        let hash = User::hash_password(password)
            .map_err(|e| ServerError::Config(format!("Cannot hash admin password: {e}")))?;
        let admin = users
            .create("Admin", email, hash, Role::Admin)
            .await
            .map_err(crate::utils::AppError::from)?;
        tracing::info!(user = %admin.id, email = %admin.email, "Admin account created");
        Ok(Some(admin))
    }

    pub fn tables(&self) -> DiningTableRepository {
        DiningTableRepository::new(self.db.clone())
    }

    pub fn reservations(&self) -> ReservationRepository {
        ReservationRepository::new(self.db.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn timezone(&self) -> chrono_tz::Tz {
        self.config.timezone
    }
}

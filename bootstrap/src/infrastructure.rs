//! 基础设施资源管理

use std::time::Duration;

use ims_adapter_postgres::{
    MigrationManager, MigrationResult, PostgresConfig, TransactionManager, create_pool,
};
use ims_config::AppConfig;
use ims_errors::AppResult;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use crate::retry::{RetryConfig, with_retry};
use crate::schema::migrations;

/// 基础设施资源容器
///
/// 进程内唯一的 PostgreSQL 连接池及其派生资源
#[derive(Clone)]
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（连接带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        Self::from_config_with_retry(config, &RetryConfig::default()).await
    }

    pub async fn from_config_with_retry(
        config: AppConfig,
        retry_config: &RetryConfig,
    ) -> AppResult<Self> {
        let pg_config = postgres_config(&config);
        let postgres_pool = with_retry(retry_config, "PostgreSQL connection", || {
            let cfg = pg_config.clone();
            async move { create_pool(&cfg).await }
        })
        .await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        Ok(Self::from_pool(config, postgres_pool))
    }

    /// 使用已有连接池构建（测试中使用惰性连接池）
    pub fn from_pool(config: AppConfig, postgres_pool: PgPool) -> Self {
        Self {
            config,
            postgres_pool,
        }
    }

    /// 应用全部待处理的 schema 迁移
    pub async fn migrate(&self) -> AppResult<MigrationResult> {
        let result = MigrationManager::new(self.postgres_pool.clone())
            .migrate(&migrations())
            .await?
            .into_result()?;

        info!(
            applied = result.applied_count(),
            skipped = result.skipped.len(),
            "Database migrations completed"
        );
        Ok(result)
    }

    /// 获取应用配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取 PostgreSQL 连接池
    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    /// 基于共享连接池的事务管理器
    pub fn transaction_manager(&self) -> TransactionManager {
        TransactionManager::new(self.postgres_pool.clone())
    }

    /// Store 默认事务截止时间
    pub fn transaction_timeout(&self) -> Duration {
        self.config.store.transaction_timeout()
    }
}

fn postgres_config(config: &AppConfig) -> PostgresConfig {
    PostgresConfig::new(config.database.url.expose_secret())
        .with_max_connections(config.database.max_connections)
        .with_min_connections(config.database.min_connections)
        .with_acquire_timeout(config.database.acquire_timeout())
}

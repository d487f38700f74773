//! PostgreSQL 事务管理模块
//!
//! [`TransactionManager::run`] 是两个 Store 共用的事务单元：
//! begin → 写入 → 事务内回读 → commit；任何错误都回滚并原样返回，
//! 超过截止时间则放弃进行中的工作并返回 `Timeout`。

use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use ims_errors::{AppError, AppResult};
use metrics::{counter, histogram};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, error, warn};

use crate::map_sqlx_error;

/// 事务隔离级别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IsolationLevel {
    /// 读已提交（PostgreSQL 默认）
    #[default]
    ReadCommitted,
    /// 可重复读
    RepeatableRead,
    /// 可串行化
    Serializable,
}

impl IsolationLevel {
    /// 转换为 SQL 字符串
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

/// 事务访问模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessMode {
    /// 读写
    #[default]
    ReadWrite,
    /// 只读
    ReadOnly,
}

impl AccessMode {
    /// 转换为 SQL 字符串
    pub fn as_sql(&self) -> &'static str {
        match self {
            AccessMode::ReadWrite => "READ WRITE",
            AccessMode::ReadOnly => "READ ONLY",
        }
    }
}

/// 事务选项
#[derive(Debug, Clone, Default)]
pub struct TransactionOptions {
    /// 隔离级别
    pub isolation_level: IsolationLevel,
    /// 访问模式
    pub access_mode: AccessMode,
    /// 截止时间，`None` 表示不限
    pub timeout: Option<Duration>,
}

impl TransactionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置隔离级别
    pub fn with_isolation_level(mut self, level: IsolationLevel) -> Self {
        self.isolation_level = level;
        self
    }

    /// 设置为只读
    pub fn read_only(mut self) -> Self {
        self.access_mode = AccessMode::ReadOnly;
        self
    }

    /// 设置截止时间
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 生成 SET TRANSACTION 语句
    pub fn to_sql(&self) -> String {
        format!(
            "SET TRANSACTION ISOLATION LEVEL {}, {}",
            self.isolation_level.as_sql(),
            self.access_mode.as_sql()
        )
    }

    fn is_default_mode(&self) -> bool {
        self.isolation_level == IsolationLevel::ReadCommitted
            && self.access_mode == AccessMode::ReadWrite
    }
}

/// 事务结果标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Committed,
    RolledBack,
    TimedOut,
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Outcome::Committed => "committed",
            Outcome::RolledBack => "rolled_back",
            Outcome::TimedOut => "timed_out",
        }
    }
}

fn record_outcome(operation: &'static str, outcome: Outcome, started: Instant) {
    let outcome = outcome.as_str();
    counter!("ims_transactions_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
    histogram!("ims_transaction_duration_seconds", "operation" => operation, "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

/// 事务管理器
#[derive(Debug, Clone)]
pub struct TransactionManager {
    pool: PgPool,
}

impl TransactionManager {
    /// 创建新的事务管理器
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取连接池引用
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 开始事务
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(map_sqlx_error)
    }

    /// 开始带选项的事务
    pub async fn begin_with_options(
        &self,
        options: &TransactionOptions,
    ) -> AppResult<Transaction<'static, Postgres>> {
        let mut tx = self.begin().await?;

        if !options.is_default_mode() {
            sqlx::query(&options.to_sql())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        Ok(tx)
    }

    /// 在单个事务中执行一次逻辑操作
    ///
    /// `work` 拿到事务连接，完成全部写入与回读。返回 `Ok` 时提交，
    /// 返回 `Err` 时回滚并把原始错误交给调用方；回滚本身失败只记录日志。
    /// 设置了 `options.timeout` 时，超时会丢弃进行中的 future，
    /// 事务随之被回滚，调用方得到 `AppError::Timeout`。
    pub async fn run<T, F>(
        &self,
        operation: &'static str,
        options: &TransactionOptions,
        work: F,
    ) -> AppResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, AppResult<T>> + Send,
    {
        let started = Instant::now();
        let unit = self.run_unbounded(operation, options, work, started);

        match options.timeout {
            None => unit.await,
            Some(deadline) => match tokio::time::timeout(deadline, unit).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        operation,
                        deadline_ms = deadline.as_millis() as u64,
                        "Transaction deadline exceeded, rolling back"
                    );
                    record_outcome(operation, Outcome::TimedOut, started);
                    Err(AppError::timeout(format!(
                        "{} exceeded deadline of {}ms",
                        operation,
                        deadline.as_millis()
                    )))
                }
            },
        }
    }

    async fn run_unbounded<T, F>(
        &self,
        operation: &'static str,
        options: &TransactionOptions,
        work: F,
        started: Instant,
    ) -> AppResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, AppResult<T>> + Send,
    {
        let mut tx = self.begin_with_options(options).await?;
        debug!(operation, "Transaction started");

        let outcome = work(&mut *tx).await;
        match outcome {
            Ok(value) => match tx.commit().await {
                Ok(()) => {
                    debug!(operation, "Transaction committed");
                    record_outcome(operation, Outcome::Committed, started);
                    Ok(value)
                }
                // 提交失败时 PostgreSQL 已回滚整个事务
                Err(commit_err) => {
                    warn!(operation, error = %commit_err, "Transaction commit failed");
                    record_outcome(operation, Outcome::RolledBack, started);
                    Err(map_sqlx_error(commit_err))
                }
            },
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!(
                        operation,
                        error = %rollback_err,
                        "Failed to rollback transaction"
                    );
                }
                debug!(operation, error = %err, "Transaction rolled back");
                record_outcome(operation, Outcome::RolledBack, started);
                Err(err)
            }
        }
    }
}

//! 数据库错误映射
//!
//! 按 SQLSTATE 把 SQLx 错误归类为 AppError

use ims_errors::AppError;

/// 将 SQLx 错误转换为 AppError
///
/// - 唯一键 / 外键 / 检查约束违规 → `Conflict`
/// - 连接池与协议错误 → `Internal`
/// - 其余数据库错误 → `Database`
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => {
            let Some(code) = db_err.code() else {
                return AppError::database(db_err.to_string());
            };
            let constraint = db_err.constraint().unwrap_or("unknown");
            match code.as_ref() {
                "23505" => AppError::conflict(format!(
                    "Duplicate entry violates unique constraint {}",
                    constraint
                )),
                "23503" => AppError::conflict(format!(
                    "Foreign key constraint violation on {}",
                    constraint
                )),
                "23514" => AppError::conflict(format!(
                    "Check constraint violation on {}",
                    constraint
                )),
                "23502" => AppError::validation("Not null constraint violation"),
                "22001" => AppError::validation("String data too long"),
                "22P02" => AppError::validation("Invalid input syntax"),
                // query_canceled，通常由 statement_timeout 触发
                "57014" => AppError::timeout(format!("Query canceled: {}", db_err)),
                _ => AppError::database(format!("Database error ({}): {}", code, db_err)),
            }
        }
        sqlx::Error::PoolTimedOut => AppError::internal("Database connection pool timeout"),
        sqlx::Error::PoolClosed => AppError::internal("Database connection pool is closed"),
        sqlx::Error::Protocol(msg) => AppError::internal(format!("Database protocol error: {}", msg)),
        _ => AppError::database(e.to_string()),
    }
}

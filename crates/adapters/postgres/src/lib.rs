//! ims-adapter-postgres - PostgreSQL 适配器
//!
//! 连接池、事务单元（unit of work）、SQLx 错误映射与迁移管理。

mod connection;
mod error_mapper;
mod migration;
mod transaction;

pub use connection::*;
pub use error_mapper::*;
pub use migration::*;
pub use transaction::*;

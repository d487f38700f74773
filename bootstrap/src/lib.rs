//! ims-bootstrap - 统一服务启动骨架
//!
//! 配置加载、运行时初始化、带重试的数据库连接、迁移与健康检查

mod health;
mod infrastructure;
mod retry;
mod runtime;
mod schema;
mod starter;

pub use health::*;
pub use infrastructure::*;
pub use retry::*;
pub use runtime::*;
pub use schema::*;
pub use starter::*;

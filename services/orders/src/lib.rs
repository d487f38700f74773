//! ims-orders - 订单聚合
//!
//! 订单头与订单明细作为一个整体创建、读取和删除；
//! 未完整创建的订单永远不可见。

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::OrderService;
pub use domain::*;
pub use infrastructure::persistence::PostgresOrderStore;

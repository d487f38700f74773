//! ims-inventory - 产品目录与库存流水
//!
//! 库存数量只能通过流水账（[`domain::StockLedger`]）修改：
//! 余额更新与流水写入在同一事务中完成。

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::InventoryService;
pub use domain::*;
pub use infrastructure::persistence::{PostgresProductCatalog, PostgresStockLedger};

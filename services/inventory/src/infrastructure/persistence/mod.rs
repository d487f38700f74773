//! PostgreSQL Store 实现

mod catalog;
mod ledger;
mod rows;

pub use catalog::PostgresProductCatalog;
pub use ledger::PostgresStockLedger;

//! PostgreSQL Store 实现

mod aggregate;
mod rows;
mod store;

pub use store::PostgresOrderStore;

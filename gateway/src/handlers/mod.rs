//! HTTP handlers
//!
//! 每个 handler 只做边界校验，然后调用一次门面操作。

pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;

//! 领域层

pub mod order;
pub mod repositories;

pub use order::*;
pub use repositories::*;

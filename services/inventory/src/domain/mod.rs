//! 领域层

pub mod movement;
pub mod product;
pub mod repositories;

pub use movement::*;
pub use product::*;
pub use repositories::*;

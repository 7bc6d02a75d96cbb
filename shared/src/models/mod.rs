//! Data models
//!
//! Shared between the REST client and the bill desk core.
//! Wire types use camelCase JSON to match the POS API.

pub mod bill;
pub mod business;
pub mod dashboard;
pub mod order;
pub mod product;

// Re-exports
pub use bill::*;
pub use business::*;
pub use dashboard::*;
pub use order::*;
pub use product::*;

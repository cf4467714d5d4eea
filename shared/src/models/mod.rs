//! Data models
//!
//! Shared between catalog-server and frontend (via API).
//! All IDs are `i64` snowflakes (see [`crate::util::snowflake_id`]).

pub mod category;
pub mod product;

// Re-exports
pub use category::*;
pub use product::*;

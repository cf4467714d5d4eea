//! Shared types for the storefront catalog
//!
//! Wire models and the unified error system used by `catalog-server`
//! and by API consumers (admin panel, storefront pages).

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

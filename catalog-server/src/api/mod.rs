//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`categories`] - 分类管理接口

pub mod categories;
pub mod health;

// Re-export common types for handlers
pub use crate::utils::AppResult;

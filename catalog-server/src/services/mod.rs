//! 服务层
//!
//! - [`CategoryService`] - 分类层级管理（创建、更新、删除、树、面包屑、商品计数）

pub mod category_service;

pub use category_service::CategoryService;

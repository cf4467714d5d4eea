//! Product Model
//!
//! Products are owned by the storefront; the catalog only counts them.

use super::category::Visibility;
use serde::{Deserialize, Serialize};

/// Product lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    #[default]
    Active,
    Archived,
}

/// Product entity (fields relevant to the catalog)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Category reference: a category id (decimal string) or a category slug
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub status: ProductStatus,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            price: 0.0,
            stock: 0,
            in_stock: false,
            visibility: Visibility::Public,
            status: ProductStatus::Active,
        }
    }
}

//! Category hierarchy
//!
//! Pure logic that keeps the category forest consistent and derives views
//! from a snapshot of it. Nothing here touches storage; callers load the
//! category set and pass it in.
//!
//! - [`slug`] - URL-safe unique identifiers from display names
//! - [`cycle`] - rejects parent assignments that would close a loop
//! - [`tree`] - nested tree / breadcrumb views
//! - [`count`] - descendant-aware product counts
//! - [`validation`] - field validation for create/update payloads
//! - [`error`] - domain error taxonomy

pub mod count;
pub mod cycle;
pub mod error;
pub mod slug;
pub mod tree;
pub mod validation;

pub use count::{count_products, count_products_batch, descendant_ids};
pub use cycle::{cycle_chain, would_create_cycle};
pub use error::{CategoryError, CategoryResult};
pub use slug::{generate_slug, is_valid_slug, slugify};
pub use tree::{build_tree, build_tree_with_counts, category_path, flatten};
pub use validation::{FieldError, validate_create, validate_update};

use shared::models::Category;
use std::collections::HashMap;

/// Adjacency index over a flat category snapshot
///
/// Built once per operation so that child and parent lookups are O(1)
/// instead of rescanning the list at every recursion step.
pub(crate) struct Hierarchy<'a> {
    by_id: HashMap<i64, &'a Category>,
    children: HashMap<Option<i64>, Vec<&'a Category>>,
}

impl<'a> Hierarchy<'a> {
    pub(crate) fn new(categories: &'a [Category]) -> Self {
        let mut by_id = HashMap::with_capacity(categories.len());
        let mut children: HashMap<Option<i64>, Vec<&'a Category>> = HashMap::new();
        for category in categories {
            by_id.insert(category.id, category);
            children
                .entry(category.parent_category)
                .or_default()
                .push(category);
        }
        for siblings in children.values_mut() {
            siblings.sort_by(|a, b| {
                a.sort_order
                    .cmp(&b.sort_order)
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
        Self { by_id, children }
    }

    pub(crate) fn get(&self, id: i64) -> Option<&'a Category> {
        self.by_id.get(&id).copied()
    }

    /// Direct children of `parent` (None = roots), already in sibling order
    pub(crate) fn children_of(&self, parent: Option<i64>) -> &[&'a Category] {
        self.children
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use shared::models::Category;

    /// Wood(1) <- Oak(2) <- Tables(3)
    pub fn wood_oak_tables() -> Vec<Category> {
        vec![
            Category::new(1, "Wood", "wood"),
            Category::new(2, "Oak", "oak").with_parent(1),
            Category::new(3, "Tables", "tables").with_parent(2),
        ]
    }
}

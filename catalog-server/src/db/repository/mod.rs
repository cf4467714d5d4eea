//! Repository Module
//!
//! Storage interfaces consumed by the category service, plus their
//! SurrealDB implementations.
//!
//! The service only ever sees [`CategoryStore`] and [`ProductCounter`];
//! the concrete backend is chosen once at start-up.

pub mod category;
pub mod product;

// Re-exports
pub use category::CategoryRepository;
pub use product::ProductRepository;

use async_trait::async_trait;
use shared::models::{Category, Visibility};
use std::collections::{HashMap, HashSet};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violation, e.g. "Database index `category_slug` already contains 'oak'"
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Category persistence
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, optionally filtered by visibility, ordered by sort_order then name
    async fn find_all(&self, visibility: Option<Visibility>) -> RepoResult<Vec<Category>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>>;
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>>;
    /// Every slug currently stored
    async fn slugs(&self) -> RepoResult<HashSet<String>>;
    /// Number of categories whose parent is `id`
    async fn count_children(&self, id: i64) -> RepoResult<u64>;
    /// Insert a new record; a taken slug yields [`RepoError::Duplicate`]
    async fn insert(&self, category: Category) -> RepoResult<Category>;
    /// Replace the stored record with the same id
    async fn update(&self, category: Category) -> RepoResult<Category>;
    /// Returns false when nothing was deleted
    async fn delete(&self, id: i64) -> RepoResult<bool>;

    async fn health_check(&self) -> RepoResult<()>;
    fn backend_name(&self) -> &'static str;
}

/// Counts products by category
///
/// A product belongs to a category when its `category` field equals the
/// category id (as a decimal string) or the category slug.
#[async_trait]
pub trait ProductCounter: Send + Sync {
    /// Products belonging to any category in `ids`
    async fn count_in(&self, ids: &HashSet<i64>) -> RepoResult<u64>;
    /// Direct product count per category in `ids` (missing = 0)
    async fn count_grouped(&self, ids: &HashSet<i64>) -> RepoResult<HashMap<i64, u64>>;
}

/// Reference strings a product may use for each of `ids`, mapped back to the id.
///
/// Every id contributes its decimal form; a slug contributes itself unless it
/// is the decimal form of a requested or existing category id, in which case
/// the id match wins. Each string therefore resolves to exactly one category.
pub(crate) fn reference_keys<F>(
    ids: &HashSet<i64>,
    slugs: impl IntoIterator<Item = (i64, String)>,
    is_category_id: F,
) -> HashMap<String, i64>
where
    F: Fn(i64) -> bool,
{
    let mut keys: HashMap<String, i64> = ids.iter().map(|id| (id.to_string(), *id)).collect();
    for (id, slug) in slugs {
        if as_decimal_id(&slug).is_some_and(|n| ids.contains(&n) || is_category_id(n)) {
            continue;
        }
        keys.insert(slug, id);
    }
    keys
}

/// `slug` read as a category id, only when it is exactly the id's decimal form
pub(crate) fn as_decimal_id(slug: &str) -> Option<i64> {
    slug.parse::<i64>()
        .ok()
        .filter(|n| n.to_string() == slug)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

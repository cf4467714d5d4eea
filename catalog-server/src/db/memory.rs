//! In-memory store
//!
//! Implements [`CategoryStore`] and [`ProductCounter`] with maps guarded by
//! `tokio::sync::RwLock`. Nothing survives a restart; used for local
//! development (`STORE_BACKEND=memory`) and tests.
//!
//! Slug uniqueness is checked under the same write lock as the insert, so
//! two concurrent creates cannot both claim a slug.

use super::repository::{
    CategoryStore, ProductCounter, RepoError, RepoResult, reference_keys,
};
use async_trait::async_trait;
use shared::models::{Category, Product, Visibility};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    categories: RwLock<HashMap<i64, Category>>,
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with products
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            categories: RwLock::new(HashMap::new()),
            products: RwLock::new(products),
        }
    }

    async fn reference_keys_for(&self, ids: &HashSet<i64>) -> HashMap<String, i64> {
        let categories = self.categories.read().await;
        let slugs = ids
            .iter()
            .filter_map(|id| categories.get(id).map(|c| (*id, c.slug.clone())));
        reference_keys(ids, slugs, |id| categories.contains_key(&id))
    }
}

fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn find_all(&self, visibility: Option<Visibility>) -> RepoResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut result: Vec<Category> = categories
            .values()
            .filter(|c| visibility.is_none_or(|v| c.visibility == v))
            .cloned()
            .collect();
        sort_categories(&mut result);
        Ok(result)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn slugs(&self) -> RepoResult<HashSet<String>> {
        let categories = self.categories.read().await;
        Ok(categories.values().map(|c| c.slug.clone()).collect())
    }

    async fn count_children(&self, id: i64) -> RepoResult<u64> {
        let categories = self.categories.read().await;
        Ok(categories
            .values()
            .filter(|c| c.parent_category == Some(id))
            .count() as u64)
    }

    async fn insert(&self, category: Category) -> RepoResult<Category> {
        let mut categories = self.categories.write().await;
        if categories.contains_key(&category.id) {
            return Err(RepoError::Duplicate(format!(
                "Category {} already exists",
                category.id
            )));
        }
        if categories.values().any(|c| c.slug == category.slug) {
            return Err(RepoError::Duplicate(format!(
                "Slug '{}' already exists",
                category.slug
            )));
        }
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> RepoResult<Category> {
        let mut categories = self.categories.write().await;
        if !categories.contains_key(&category.id) {
            return Err(RepoError::NotFound(format!(
                "Category {} not found",
                category.id
            )));
        }
        if categories
            .values()
            .any(|c| c.id != category.id && c.slug == category.slug)
        {
            return Err(RepoError::Duplicate(format!(
                "Slug '{}' already exists",
                category.slug
            )));
        }
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.categories.write().await.remove(&id).is_some())
    }

    async fn health_check(&self) -> RepoResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl ProductCounter for MemoryStore {
    async fn count_in(&self, ids: &HashSet<i64>) -> RepoResult<u64> {
        let keys = self.reference_keys_for(ids).await;
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| keys.contains_key(&p.category))
            .count() as u64)
    }

    async fn count_grouped(&self, ids: &HashSet<i64>) -> RepoResult<HashMap<i64, u64>> {
        let keys = self.reference_keys_for(ids).await;
        let products = self.products.read().await;
        let mut counts: HashMap<i64, u64> = ids.iter().map(|id| (*id, 0)).collect();
        for product in products.iter() {
            if let Some(id) = keys.get(&product.category) {
                *counts.entry(*id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_rejects_duplicate_slug() {
        let store = MemoryStore::new();
        store.insert(Category::new(1, "Oak", "oak")).await.unwrap();

        let err = store.insert(Category::new(2, "Oak 2", "oak")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
        assert_eq!(store.find_all(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_orders_and_filters() {
        let store = MemoryStore::new();
        store
            .insert(Category::new(1, "Zinc", "zinc").with_sort_order(0))
            .await
            .unwrap();
        store
            .insert(Category::new(2, "Brass", "brass").with_sort_order(1))
            .await
            .unwrap();
        let mut hidden = Category::new(3, "Alder", "alder");
        hidden.visibility = Visibility::Private;
        store.insert(hidden).await.unwrap();

        let names: Vec<String> = store
            .find_all(None)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alder", "Zinc", "Brass"]);

        let public = store.find_all(Some(Visibility::Public)).await.unwrap();
        assert_eq!(public.len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update(Category::new(9, "X", "x")).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_counts_match_id_or_slug() {
        let store = MemoryStore::with_products(vec![
            Product::new(1, "a", "1"),
            Product::new(2, "b", "oak"),
            Product::new(3, "c", "pine"),
        ]);
        store.insert(Category::new(1, "Oak", "oak")).await.unwrap();

        let ids = HashSet::from([1]);
        assert_eq!(store.count_in(&ids).await.unwrap(), 2);
        assert_eq!(store.count_grouped(&ids).await.unwrap()[&1], 2);
    }

    #[tokio::test]
    async fn test_numeric_slug_never_steals_an_id_match() {
        let store = MemoryStore::with_products(vec![Product::new(1, "a", "2")]);
        store.insert(Category::new(1, "Alpha", "2")).await.unwrap();
        store.insert(Category::new(2, "Beta", "beta")).await.unwrap();

        assert_eq!(store.count_in(&HashSet::from([1])).await.unwrap(), 0);
        assert_eq!(store.count_in(&HashSet::from([2])).await.unwrap(), 1);

        for _ in 0..16 {
            let grouped = store.count_grouped(&HashSet::from([1, 2])).await.unwrap();
            assert_eq!(grouped[&1], 0);
            assert_eq!(grouped[&2], 1);
        }
    }

    #[tokio::test]
    async fn test_numeric_slug_matches_when_no_such_id() {
        let store = MemoryStore::with_products(vec![Product::new(1, "a", "2024")]);
        store.insert(Category::new(1, "2024", "2024")).await.unwrap();
        assert_eq!(store.count_in(&HashSet::from([1])).await.unwrap(), 1);
    }
}

//! Product Repository
//!
//! The catalog never edits products; it only counts them per category.

use super::{BaseRepository, ProductCounter, RepoResult, as_decimal_id, reference_keys};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Debug, Deserialize)]
struct CategoryKeyRow {
    category_id: i64,
    slug: String,
}

#[derive(Debug, Deserialize)]
struct GroupRow {
    category: String,
    count: i64,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Every string a product may use to reference one of `ids`, mapped back to the id
    async fn reference_keys_for(&self, ids: &HashSet<i64>) -> RepoResult<HashMap<String, i64>> {
        let id_list: Vec<i64> = ids.iter().copied().collect();
        let rows: Vec<CategoryKeyRow> = self
            .base
            .db()
            .query("SELECT record::id(id) AS category_id, slug FROM category WHERE record::id(id) IN $ids")
            .bind(("ids", id_list))
            .await?
            .take(0)?;

        // slugs spelled like an id lose to the category that owns that id
        let numeric: Vec<i64> = rows.iter().filter_map(|r| as_decimal_id(&r.slug)).collect();
        let existing: HashSet<i64> = if numeric.is_empty() {
            HashSet::new()
        } else {
            let found: Vec<i64> = self
                .base
                .db()
                .query("SELECT VALUE record::id(id) FROM category WHERE record::id(id) IN $ids")
                .bind(("ids", numeric))
                .await?
                .take(0)?;
            found.into_iter().collect()
        };

        let slugs = rows.into_iter().map(|r| (r.category_id, r.slug));
        Ok(reference_keys(ids, slugs, |id| existing.contains(&id)))
    }
}

#[async_trait]
impl ProductCounter for ProductRepository {
    async fn count_in(&self, ids: &HashSet<i64>) -> RepoResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let keys: Vec<String> = self.reference_keys_for(ids).await?.into_keys().collect();
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM product WHERE category IN $keys GROUP ALL")
            .bind(("keys", keys))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }

    async fn count_grouped(&self, ids: &HashSet<i64>) -> RepoResult<HashMap<i64, u64>> {
        let mut counts: HashMap<i64, u64> = ids.iter().map(|id| (*id, 0)).collect();
        if ids.is_empty() {
            return Ok(counts);
        }
        let lookup = self.reference_keys_for(ids).await?;
        let keys: Vec<String> = lookup.keys().cloned().collect();
        let rows: Vec<GroupRow> = self
            .base
            .db()
            .query("SELECT category, count() AS count FROM product WHERE category IN $keys GROUP BY category")
            .bind(("keys", keys))
            .await?
            .take(0)?;

        for row in rows {
            if let Some(id) = lookup.get(&row.category) {
                *counts.entry(*id).or_insert(0) += row.count.max(0) as u64;
            }
        }
        Ok(counts)
    }
}

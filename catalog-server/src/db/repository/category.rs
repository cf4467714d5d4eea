//! Category Repository

use super::{BaseRepository, CategoryStore, RepoError, RepoResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{Category, Visibility};
use std::collections::HashSet;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

/// Projection returning the numeric record key instead of the full record id
const SELECT_FIELDS: &str = "SELECT record::id(id) AS category_id, name, slug, description, \
     image, visibility, sort_order, parent_category, seo_title, seo_description, seo_keywords, \
     created_at, updated_at";

/// Row shape produced by [`SELECT_FIELDS`]
#[derive(Debug, Deserialize)]
struct CategoryRow {
    category_id: i64,
    name: String,
    slug: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    visibility: Option<Visibility>,
    #[serde(default)]
    sort_order: Option<i32>,
    #[serde(default)]
    parent_category: Option<i64>,
    #[serde(default)]
    seo_title: Option<String>,
    #[serde(default)]
    seo_description: Option<String>,
    #[serde(default)]
    seo_keywords: Option<Vec<String>>,
    #[serde(default)]
    created_at: Option<i64>,
    #[serde(default)]
    updated_at: Option<i64>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.category_id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            image: row.image,
            visibility: row.visibility.unwrap_or_default(),
            sort_order: row.sort_order.unwrap_or(0),
            parent_category: row.parent_category,
            seo_title: row.seo_title,
            seo_description: row.seo_description,
            seo_keywords: row.seo_keywords.unwrap_or_default(),
            created_at: row.created_at.unwrap_or(0),
            updated_at: row.updated_at.unwrap_or(0),
        }
    }
}

/// Stored document (the id lives in the record key)
#[derive(Debug, Serialize)]
struct CategoryDoc {
    name: String,
    slug: String,
    description: Option<String>,
    image: Option<String>,
    visibility: Visibility,
    sort_order: i32,
    parent_category: Option<i64>,
    seo_title: Option<String>,
    seo_description: Option<String>,
    seo_keywords: Vec<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<Category> for CategoryDoc {
    fn from(c: Category) -> Self {
        Self {
            name: c.name,
            slug: c.slug,
            description: c.description,
            image: c.image,
            visibility: c.visibility,
            sort_order: c.sort_order,
            parent_category: c.parent_category,
            seo_title: c.seo_title,
            seo_description: c.seo_description,
            seo_keywords: c.seo_keywords,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn select_rows(
        &self,
        sql: String,
        bindings: Vec<(&'static str, serde_json::Value)>,
    ) -> RepoResult<Vec<Category>> {
        let mut query = self.base.db().query(sql);
        for binding in bindings {
            query = query.bind(binding);
        }
        let rows: Vec<CategoryRow> = query.await?.take(0)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn find_all(&self, visibility: Option<Visibility>) -> RepoResult<Vec<Category>> {
        match visibility {
            Some(v) => {
                self.select_rows(
                    format!(
                        "{SELECT_FIELDS} FROM {TABLE} WHERE visibility = $visibility ORDER BY sort_order, name"
                    ),
                    vec![("visibility", v.as_str().into())],
                )
                .await
            }
            None => {
                self.select_rows(
                    format!("{SELECT_FIELDS} FROM {TABLE} ORDER BY sort_order, name"),
                    Vec::new(),
                )
                .await
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>> {
        let rows = self
            .select_rows(
                format!("{SELECT_FIELDS} FROM type::thing($tb, $id)"),
                vec![("tb", TABLE.into()), ("id", id.into())],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let rows = self
            .select_rows(
                format!("{SELECT_FIELDS} FROM {TABLE} WHERE slug = $slug LIMIT 1"),
                vec![("slug", slug.into())],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn slugs(&self) -> RepoResult<HashSet<String>> {
        let slugs: Vec<String> = self
            .base
            .db()
            .query("SELECT VALUE slug FROM category")
            .await?
            .take(0)?;
        Ok(slugs.into_iter().collect())
    }

    async fn count_children(&self, id: i64) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM category WHERE parent_category = $id GROUP ALL")
            .bind(("id", id))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }

    async fn insert(&self, category: Category) -> RepoResult<Category> {
        let id = category.id;
        let doc = CategoryDoc::from(category.clone());
        self.base
            .db()
            .query("CREATE type::thing($tb, $id) CONTENT $data RETURN NONE")
            .bind(("tb", TABLE))
            .bind(("id", id))
            .bind(("data", doc))
            .await?
            .check()?;
        tracing::debug!(id, slug = %category.slug, "Category inserted");
        Ok(category)
    }

    async fn update(&self, category: Category) -> RepoResult<Category> {
        let id = category.id;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Category {} not found", id)));
        }
        let doc = CategoryDoc::from(category.clone());
        self.base
            .db()
            .query("UPDATE type::thing($tb, $id) CONTENT $data RETURN NONE")
            .bind(("tb", TABLE))
            .bind(("id", id))
            .bind(("data", doc))
            .await?
            .check()?;
        tracing::debug!(id, "Category updated");
        Ok(category)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        if self.find_by_id(id).await?.is_none() {
            return Ok(false);
        }
        self.base
            .db()
            .query("DELETE type::thing($tb, $id) RETURN NONE")
            .bind(("tb", TABLE))
            .bind(("id", id))
            .await?
            .check()?;
        tracing::debug!(id, "Category deleted");
        Ok(true)
    }

    async fn health_check(&self) -> RepoResult<()> {
        self.base.db().health().await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "surrealdb"
    }
}

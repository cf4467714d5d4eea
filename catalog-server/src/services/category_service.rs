//! Category Service - hierarchy-safe CRUD and derived views
//!
//! Every operation reloads the category set from the store; nothing about
//! the hierarchy is cached in process. Domain errors are raised before any
//! write is issued, so a rejected request never leaves a partial change.

use crate::categories::{
    CategoryError, CategoryResult, build_tree_with_counts, category_path, count_products,
    count_products_batch, cycle_chain, generate_slug, validate_create, validate_update,
};
use crate::categories::validation::FieldError;
use crate::db::repository::{CategoryStore, ProductCounter, RepoError};
use shared::models::{
    Category, CategoryCreate, CategoryTreeNode, CategoryUpdate, CategoryWithCount,
    SortOrderUpdate, Visibility,
};
use shared::util::{now_millis, snowflake_id};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
    counter: Arc<dyn ProductCounter>,
}

impl std::fmt::Debug for CategoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryService")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>, counter: Arc<dyn ProductCounter>) -> Self {
        Self { store, counter }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn health_check(&self) -> CategoryResult<()> {
        self.store.health_check().await?;
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn list(&self, visibility: Option<Visibility>) -> CategoryResult<Vec<Category>> {
        Ok(self.store.find_all(visibility).await?)
    }

    /// Listing with descendant-aware product counts (one grouped count query)
    pub async fn list_with_counts(
        &self,
        visibility: Option<Visibility>,
    ) -> CategoryResult<Vec<CategoryWithCount>> {
        let (categories, counts) = self.visible_with_counts(visibility).await?;
        Ok(categories
            .into_iter()
            .map(|category| CategoryWithCount {
                product_count: counts.get(&category.id).copied().unwrap_or(0),
                category,
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> CategoryResult<Category> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CategoryError::not_found(id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> CategoryResult<Category> {
        self.store
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| CategoryError::NotFound(slug.to_string()))
    }

    /// Nested tree from the roots, each node carrying its product count
    pub async fn tree(
        &self,
        visibility: Option<Visibility>,
    ) -> CategoryResult<Vec<CategoryTreeNode>> {
        let (categories, counts) = self.visible_with_counts(visibility).await?;
        Ok(build_tree_with_counts(&categories, &counts))
    }

    /// Categories matching `visibility`, with counts taken over the whole
    /// hierarchy so hidden descendants still contribute their products.
    async fn visible_with_counts(
        &self,
        visibility: Option<Visibility>,
    ) -> CategoryResult<(Vec<Category>, HashMap<i64, u64>)> {
        let all = self.store.find_all(None).await?;
        let counts = count_products_batch(&all, self.counter.as_ref()).await?;
        let visible = match visibility {
            Some(v) => all.into_iter().filter(|c| c.visibility == v).collect(),
            None => all,
        };
        Ok((visible, counts))
    }

    /// Breadcrumb names from the root down to `id`
    pub async fn path(&self, id: i64) -> CategoryResult<Vec<String>> {
        let categories = self.store.find_all(None).await?;
        category_path(id, &categories).ok_or_else(|| CategoryError::not_found(id))
    }

    /// Products in `id` and all of its descendants
    pub async fn product_count(&self, id: i64) -> CategoryResult<u64> {
        let categories = self.store.find_all(None).await?;
        if !categories.iter().any(|c| c.id == id) {
            return Err(CategoryError::not_found(id));
        }
        Ok(count_products(id, &categories, self.counter.as_ref()).await?)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub async fn create(&self, data: CategoryCreate) -> CategoryResult<Category> {
        let errors = validate_create(&data);
        if !errors.is_empty() {
            return Err(CategoryError::Validation(errors));
        }

        let categories = self.store.find_all(None).await?;
        if let Some(parent) = data.parent_category {
            ensure_parent_exists(parent, &categories)?;
        }

        let existing = self.store.slugs().await?;
        let name = data.name.trim().to_string();
        let slug = match non_blank(data.slug.as_deref()) {
            Some(slug) if existing.contains(slug) => {
                return Err(CategoryError::SlugConflict(slug.to_string()));
            }
            Some(slug) => slug.to_string(),
            None => generate_slug(&name, &existing),
        };

        let id = snowflake_id();
        if let Some(chain) = cycle_chain(id, data.parent_category, &categories) {
            return Err(CategoryError::Cycle {
                id,
                parent: data.parent_category.unwrap_or(id),
                chain,
            });
        }

        let now = now_millis();
        let category = Category {
            id,
            name,
            slug: slug.clone(),
            description: data.description,
            image: data.image,
            visibility: data.visibility.unwrap_or_default(),
            sort_order: data.sort_order.unwrap_or(0),
            parent_category: data.parent_category,
            seo_title: data.seo_title,
            seo_description: data.seo_description,
            seo_keywords: data.seo_keywords,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .store
            .insert(category)
            .await
            .map_err(|e| slug_conflict_or(e, &slug))?;
        tracing::info!(id = created.id, slug = %created.slug, "Category created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, data: CategoryUpdate) -> CategoryResult<Category> {
        let errors = validate_update(&data);
        if !errors.is_empty() {
            return Err(CategoryError::Validation(errors));
        }

        let categories = self.store.find_all(None).await?;
        let current = categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CategoryError::not_found(id))?;

        let mut updated = current.clone();
        if let Some(name) = data.name {
            updated.name = name.trim().to_string();
        }

        if let Some(slug) = data.slug {
            match non_blank(Some(&slug)) {
                // Blank slug: derive a fresh one from the (possibly new) name
                None => {
                    let others: HashSet<String> = categories
                        .iter()
                        .filter(|c| c.id != id)
                        .map(|c| c.slug.clone())
                        .collect();
                    updated.slug = generate_slug(&updated.name, &others);
                }
                Some(slug) if slug != current.slug => {
                    if categories.iter().any(|c| c.id != id && c.slug == slug) {
                        return Err(CategoryError::SlugConflict(slug.to_string()));
                    }
                    updated.slug = slug.to_string();
                }
                Some(_) => {}
            }
        }

        if let Some(description) = data.description {
            updated.description = description;
        }
        if let Some(image) = data.image {
            updated.image = image;
        }
        if let Some(visibility) = data.visibility {
            updated.visibility = visibility;
        }
        if let Some(sort_order) = data.sort_order {
            updated.sort_order = sort_order;
        }
        if let Some(seo_title) = data.seo_title {
            updated.seo_title = seo_title;
        }
        if let Some(seo_description) = data.seo_description {
            updated.seo_description = seo_description;
        }
        if let Some(seo_keywords) = data.seo_keywords {
            updated.seo_keywords = seo_keywords;
        }

        if let Some(parent) = data.parent_category
            && parent != current.parent_category
        {
            if let Some(parent_id) = parent {
                ensure_parent_exists(parent_id, &categories)?;
                if let Some(chain) = cycle_chain(id, parent, &categories) {
                    tracing::warn!(id, parent = parent_id, ?chain, "Rejected circular parent");
                    return Err(CategoryError::Cycle {
                        id,
                        parent: parent_id,
                        chain,
                    });
                }
            }
            updated.parent_category = parent;
        }

        // Repeating an identical update is a no-op
        if updated == current {
            return Ok(current);
        }

        updated.updated_at = now_millis();
        let slug = updated.slug.clone();
        let saved = self
            .store
            .update(updated)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => CategoryError::not_found(id),
                other => slug_conflict_or(other, &slug),
            })?;
        tracing::info!(id, slug = %saved.slug, "Category updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> CategoryResult<()> {
        if self.store.find_by_id(id).await?.is_none() {
            return Err(CategoryError::not_found(id));
        }

        let children = self.store.count_children(id).await?;
        if children > 0 {
            tracing::warn!(id, children, "Rejected delete of category with children");
            return Err(CategoryError::HasChildren { id, children });
        }

        if !self.store.delete(id).await? {
            return Err(CategoryError::not_found(id));
        }
        tracing::info!(id, "Category deleted");
        Ok(())
    }

    /// Apply sort orders in one call; returns how many categories changed.
    ///
    /// The whole batch is checked first: an unknown id or a negative value
    /// rejects it without writing anything.
    pub async fn batch_update_sort_order(
        &self,
        updates: Vec<SortOrderUpdate>,
    ) -> CategoryResult<usize> {
        let errors: Vec<FieldError> = updates
            .iter()
            .enumerate()
            .filter(|(_, u)| u.sort_order < 0)
            .map(|(i, u)| {
                FieldError::new(
                    format!("updates[{i}].sort_order"),
                    format!("sort_order for category {} must be >= 0", u.id),
                )
            })
            .collect();
        if !errors.is_empty() {
            return Err(CategoryError::Validation(errors));
        }

        let categories = self.store.find_all(None).await?;
        let mut by_id: HashMap<i64, Category> =
            categories.into_iter().map(|c| (c.id, c)).collect();
        if let Some(missing) = updates.iter().find(|u| !by_id.contains_key(&u.id)) {
            return Err(CategoryError::not_found(missing.id));
        }

        let now = now_millis();
        let mut changed = 0;
        for update in updates {
            let Some(category) = by_id.get_mut(&update.id) else {
                continue;
            };
            if category.sort_order == update.sort_order {
                continue;
            }
            category.sort_order = update.sort_order;
            category.updated_at = now;
            self.store.update(category.clone()).await?;
            changed += 1;
        }

        tracing::info!(changed, "Category sort order updated");
        Ok(changed)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn ensure_parent_exists(parent: i64, categories: &[Category]) -> CategoryResult<()> {
    if categories.iter().any(|c| c.id == parent) {
        Ok(())
    } else {
        Err(CategoryError::field(
            "parent_category",
            format!("parent category {parent} does not exist"),
        ))
    }
}

/// The storage unique index fires when a concurrent write claimed the slug
fn slug_conflict_or(err: RepoError, slug: &str) -> CategoryError {
    match err {
        RepoError::Duplicate(_) => CategoryError::SlugConflict(slug.to_string()),
        other => CategoryError::Store(other),
    }
}

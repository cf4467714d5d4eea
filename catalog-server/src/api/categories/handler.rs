//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{
    Category, CategoryCreate, CategoryTreeNode, CategoryUpdate, CategoryWithCount,
    SortOrderUpdate, Visibility,
};

/// Query string for list / tree
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub with_counts: bool,
}

/// List response: plain categories, or categories with product counts
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CategoryList {
    Plain(Vec<Category>),
    WithCounts(Vec<CategoryWithCount>),
}

#[derive(Debug, Serialize)]
pub struct ProductCountResponse {
    pub id: i64,
    pub product_count: u64,
}

#[derive(Debug, Serialize)]
pub struct SortOrderResponse {
    pub updated: usize,
}

/// GET /api/categories - 获取所有分类
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<CategoryList>> {
    let list = if query.with_counts {
        CategoryList::WithCounts(state.catalog.list_with_counts(query.visibility).await?)
    } else {
        CategoryList::Plain(state.catalog.list(query.visibility).await?)
    };
    Ok(Json(list))
}

/// GET /api/categories/tree - 分类树
pub async fn tree(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CategoryTreeNode>>> {
    Ok(Json(state.catalog.tree(query.visibility).await?))
}

/// GET /api/categories/:id - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog.get(id).await?))
}

/// GET /api/categories/slug/:slug
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog.get_by_slug(&slug).await?))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.catalog.create(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog.update(id, payload).await?))
}

/// DELETE /api/categories/:id - 删除分类 (有子分类时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.catalog.delete(id).await?;
    Ok(Json(true))
}

/// GET /api/categories/:id/path - 面包屑 (根 → 当前)
pub async fn path(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.catalog.path(id).await?))
}

/// GET /api/categories/:id/product-count
pub async fn product_count(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductCountResponse>> {
    let product_count = state.catalog.product_count(id).await?;
    Ok(Json(ProductCountResponse { id, product_count }))
}

/// PUT /api/categories/sort-order - 批量更新排序
pub async fn batch_update_sort_order(
    State(state): State<ServerState>,
    Json(updates): Json<Vec<SortOrderUpdate>>,
) -> AppResult<Json<SortOrderResponse>> {
    let updated = state.catalog.batch_update_sort_order(updates).await?;
    Ok(Json(SortOrderResponse { updated }))
}

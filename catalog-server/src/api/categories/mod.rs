//! Category API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/categories | GET, POST | 列表 (可选 visibility / with_counts)、创建 |
//! | /api/categories/tree | GET | 分类树 (含商品计数) |
//! | /api/categories/sort-order | PUT | 批量更新排序 |
//! | /api/categories/slug/{slug} | GET | 按 slug 查询 |
//! | /api/categories/{id} | GET, PUT, DELETE | 单个分类 |
//! | /api/categories/{id}/path | GET | 面包屑 |
//! | /api/categories/{id}/product-count | GET | 商品计数 (含子分类) |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Static segments must be registered before /{id}
        .route("/tree", get(handler::tree))
        .route("/sort-order", put(handler::batch_update_sort_order))
        .route("/slug/{slug}", get(handler::get_by_slug))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/path", get(handler::path))
        .route("/{id}/product-count", get(handler::product_count))
}

use std::sync::Arc;

use crate::core::config::StoreBackend;
use crate::core::{Config, Result, ServerError};
use crate::db::{CategoryRepository, DbService, MemoryStore, ProductRepository};
use crate::services::CategoryService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 在 `main` 中构造一次，通过 axum `State` 注入到处理器。
/// 使用 Arc 实现浅拷贝，clone 成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | catalog | CategoryService | 分类服务 (持有存储后端) |
///
/// # 使用示例
///
/// ```ignore
/// let state = ServerState::initialize(&config).await?;
/// let tree = state.catalog.tree(None).await?;
/// ```
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 分类服务
    pub catalog: CategoryService,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 方法代替
    pub fn new(config: Config, catalog: CategoryService) -> Self {
        Self { config, catalog }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 存储后端 (STORE_BACKEND)
    /// 3. 分类服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        let catalog = match config.store_backend {
            StoreBackend::Surreal => {
                let db_path = config.database_path();
                if let Some(dir) = db_path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                let db = DbService::new(&db_path, &config.db_namespace, &config.db_name)
                    .await
                    .map_err(|e| ServerError::Database(e.message))?;
                surreal_catalog(db)
            }
            StoreBackend::SurrealMemory => {
                let db = DbService::in_memory(&config.db_namespace, &config.db_name)
                    .await
                    .map_err(|e| ServerError::Database(e.message))?;
                surreal_catalog(db)
            }
            StoreBackend::Memory => {
                let store = Arc::new(MemoryStore::new());
                CategoryService::new(store.clone(), store)
            }
        };

        tracing::info!(
            backend = config.store_backend.as_str(),
            "Category store initialized"
        );

        Ok(Self::new(config.clone(), catalog))
    }
}

fn surreal_catalog(db: DbService) -> CategoryService {
    let categories = Arc::new(CategoryRepository::new(db.db.clone()));
    let products = Arc::new(ProductRepository::new(db.db));
    CategoryService::new(categories, products)
}

//! Catalog Server - 店铺商品分类层级服务
//!
//! # 架构概述
//!
//! - **分类层级** (`categories`): slug 生成、环检测、分类树、商品计数
//! - **服务层** (`services`): 分类的创建/更新/删除与派生视图
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储与内存存储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! catalog-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── categories/    # 纯算法 (slug / cycle / tree / count / validation)
//! ├── services/      # 分类服务
//! ├── db/            # 存储接口与实现
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装与中间件
//! └── utils/         # 日志等工具
//! ```

pub mod api;
pub mod categories;
pub mod core;
pub mod db;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState, StoreBackend};
pub use services::CategoryService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置运行环境
///
/// 1. 加载 .env (如果存在)
/// 2. 创建工作目录
/// 3. 初始化日志 (LOG_LEVEL / LOG_JSON, 文件输出到 {work_dir}/logs)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = config.log_dir();
    let log_dir = config.is_production().then_some(log_dir.as_path());
    init_logger_with_file(Some(&config.log_level), config.log_json, log_dir);

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/
    "#
    );
}

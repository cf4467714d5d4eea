//! Database Module
//!
//! Storage for categories (and the product collection they count):
//! - [`DbService`] - embedded SurrealDB connection and schema
//! - [`repository`] - store traits and the SurrealDB-backed repositories
//! - [`memory`] - in-memory store for development and tests

pub mod memory;
pub mod repository;

pub use memory::MemoryStore;
pub use repository::{
    CategoryRepository, CategoryStore, ProductCounter, ProductRepository, RepoError, RepoResult,
};

use shared::error::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

/// Schema applied on every start-up (idempotent)
///
/// The UNIQUE index on `category.slug` is the authoritative guard against
/// two concurrent creates settling on the same slug.
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS category SCHEMALESS;
DEFINE INDEX IF NOT EXISTS category_slug ON TABLE category FIELDS slug UNIQUE;
DEFINE INDEX IF NOT EXISTS category_parent ON TABLE category FIELDS parent_category;
DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
DEFINE INDEX IF NOT EXISTS product_category ON TABLE product FIELDS category;
"#;

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) a RocksDB-backed database at `db_path`
    pub async fn new(db_path: &Path, namespace: &str, database: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %db_path.display(), "Database connection established (RocksDB)");
        Self::prepare(db, namespace, database).await
    }

    /// Ephemeral in-process database (nothing is written to disk)
    pub async fn in_memory(namespace: &str, database: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!("Database connection established (in-memory)");
        Self::prepare(db, namespace, database).await
    }

    async fn prepare(db: Surreal<Db>, namespace: &str, database: &str) -> Result<Self, AppError> {
        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }
}

//! Database Module
//!
//! Owns the embedded SurrealDB handle and applies the schema at startup.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "comanda";
const DATABASE: &str = "restaurant";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database under `data_dir` and apply the schema
    pub async fn open(data_dir: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(data_dir)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::setup(db).await
    }

    /// Open an in-memory database (tests, ephemeral runs)
    pub async fn open_memory() -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::setup(db).await
    }

    async fn setup(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        init_schema(&db).await?;
        tracing::info!("Database ready (ns={}, db={})", NAMESPACE, DATABASE);

        Ok(Self { db })
    }
}

/// Apply table and index definitions.
///
/// Tables stay SCHEMALESS (documents); only the lookups the handlers depend
/// on get indexes. Re-applying existing definitions is a no-op.
async fn init_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS user_email ON user FIELDS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS user_phone ON user FIELDS phone UNIQUE;

        DEFINE TABLE IF NOT EXISTS menu SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS food SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS food_menu ON food FIELDS menu;

        DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS order_item SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS order_item_order ON order_item FIELDS order;

        DEFINE TABLE IF NOT EXISTS invoice SCHEMALESS;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("Schema statement rejected: {e}")))?;

    Ok(())
}

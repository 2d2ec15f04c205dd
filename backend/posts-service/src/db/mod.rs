/// Database access layer
///
/// This module provides:
/// - Pool creation on top of the shared `db-pool` crate
/// - The `post` table schema, created on startup if absent
/// - The post repository
pub mod post_repo;

use db_pool::DbConfig;
use sqlx::SqlitePool;
use std::path::Path;

/// Schema for the single `post` table.
///
/// `AUTOINCREMENT` keeps ids strictly increasing and never reused, even when
/// the newest row is deleted.
const CREATE_POST_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS post (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        title   VARCHAR(120) NOT NULL,
        content TEXT NOT NULL
    )
"#;

/// Create the `post` table if it does not exist yet. Idempotent.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_POST_TABLE).execute(pool).await?;
    Ok(())
}

/// Open (creating if needed) the database at `path` and ensure the schema.
pub async fn connect(service_name: &str, path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let config = DbConfig::from_env(service_name, path);
    config.log_config();

    let pool = db_pool::create_pool(config).await?;
    ensure_schema(&pool).await?;

    tracing::info!(path = %path.display(), "post schema ready");
    Ok(pool)
}

//! Embedded schema, applied idempotently on startup.

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS locations (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE,
        address TEXT NOT NULL,
        category_id TEXT NOT NULL REFERENCES categories (id) ON DELETE RESTRICT,
        user_id TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_locations_user_category
        ON locations (user_id, category_id)
    "#,
];

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    tracing::info!("SQLite schema ensured");
    Ok(())
}

//! SQLite category repository.

use async_trait::async_trait;
use placebook_domain::{Category, CategoryId};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::helpers::{decode_id, SqlExecutor};
use crate::context::RequestContext;
use crate::infrastructure::ports::{CategoryRepo, RepoError};

pub struct SqliteCategoryRepo {
    sql: SqlExecutor,
}

impl SqliteCategoryRepo {
    pub(super) fn new(sql: SqlExecutor) -> Self {
        Self { sql }
    }
}

fn row_to_category(row: &SqliteRow) -> Result<Category, RepoError> {
    let id: String = row.try_get("id").map_err(RepoError::serialization)?;
    let name: String = row.try_get("name").map_err(RepoError::serialization)?;
    Ok(Category::with_id(decode_id(&id)?, name))
}

#[async_trait]
impl CategoryRepo for SqliteCategoryRepo {
    async fn create(&self, ctx: &RequestContext, category: &Category) -> Result<(), RepoError> {
        self.sql
            .run(
                ctx,
                "insert_category",
                sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
                    .bind(category.id.to_string())
                    .bind(category.name.as_str())
                    .execute(&self.sql.pool),
            )
            .await?;
        Ok(())
    }

    async fn list(&self, ctx: &RequestContext) -> Result<Vec<Category>, RepoError> {
        let rows = self
            .sql
            .run(
                ctx,
                "list_categories",
                sqlx::query("SELECT id, name FROM categories ORDER BY name")
                    .fetch_all(&self.sql.pool),
            )
            .await?;
        rows.iter().map(row_to_category).collect()
    }

    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: CategoryId,
    ) -> Result<Option<Category>, RepoError> {
        let row = self
            .sql
            .run(
                ctx,
                "find_category_by_id",
                sqlx::query("SELECT id, name FROM categories WHERE id = ?")
                    .bind(id.to_string())
                    .fetch_optional(&self.sql.pool),
            )
            .await?;
        row.as_ref().map(row_to_category).transpose()
    }

    async fn find_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<Option<Category>, RepoError> {
        let row = self
            .sql
            .run(
                ctx,
                "find_category_by_name",
                sqlx::query("SELECT id, name FROM categories WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&self.sql.pool),
            )
            .await?;
        row.as_ref().map(row_to_category).transpose()
    }

    async fn update(&self, ctx: &RequestContext, category: &Category) -> Result<(), RepoError> {
        self.sql
            .run(
                ctx,
                "update_category",
                sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
                    .bind(category.name.as_str())
                    .bind(category.id.to_string())
                    .execute(&self.sql.pool),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, id: CategoryId) -> Result<(), RepoError> {
        self.sql
            .run(
                ctx,
                "delete_category",
                sqlx::query("DELETE FROM categories WHERE id = ?")
                    .bind(id.to_string())
                    .execute(&self.sql.pool),
            )
            .await?;
        Ok(())
    }
}

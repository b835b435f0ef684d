//! SQLite location repository.
//!
//! Lookups and writes by id are scoped to the context user. Name lookups
//! are global because names are unique across all users.

use async_trait::async_trait;
use placebook_domain::{CategoryId, Location, LocationId};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::helpers::{decode_id, require_user, SqlExecutor};
use crate::context::RequestContext;
use crate::infrastructure::ports::{LocationRepo, RepoError};

const COLUMNS: &str = "id, name, address, category_id, user_id";

pub struct SqliteLocationRepo {
    sql: SqlExecutor,
}

impl SqliteLocationRepo {
    pub(super) fn new(sql: SqlExecutor) -> Self {
        Self { sql }
    }
}

fn row_to_location(row: &SqliteRow) -> Result<Location, RepoError> {
    let get = |column: &str| -> Result<String, RepoError> {
        row.try_get(column).map_err(RepoError::serialization)
    };
    Ok(Location {
        id: decode_id(&get("id")?)?,
        name: get("name")?,
        address: get("address")?,
        category: decode_id(&get("category_id")?)?,
        user: decode_id(&get("user_id")?)?,
    })
}

#[async_trait]
impl LocationRepo for SqliteLocationRepo {
    async fn create(&self, ctx: &RequestContext, location: &Location) -> Result<(), RepoError> {
        self.sql
            .run(
                ctx,
                "insert_location",
                sqlx::query(
                    "INSERT INTO locations (id, name, address, category_id, user_id) \
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(location.id.to_string())
                .bind(location.name.as_str())
                .bind(location.address.as_str())
                .bind(location.category.to_string())
                .bind(location.user.to_string())
                .execute(&self.sql.pool),
            )
            .await?;
        Ok(())
    }

    async fn list_for_user(&self, ctx: &RequestContext) -> Result<Vec<Location>, RepoError> {
        let user = require_user(ctx, "list_locations")?;
        let query = format!("SELECT {COLUMNS} FROM locations WHERE user_id = ? ORDER BY name");
        let rows = self
            .sql
            .run(
                ctx,
                "list_locations",
                sqlx::query(&query)
                    .bind(user.to_string())
                    .fetch_all(&self.sql.pool),
            )
            .await?;
        rows.iter().map(row_to_location).collect()
    }

    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: LocationId,
    ) -> Result<Option<Location>, RepoError> {
        let user = require_user(ctx, "find_location_by_id")?;
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = ? AND user_id = ?");
        let row = self
            .sql
            .run(
                ctx,
                "find_location_by_id",
                sqlx::query(&query)
                    .bind(id.to_string())
                    .bind(user.to_string())
                    .fetch_optional(&self.sql.pool),
            )
            .await?;
        row.as_ref().map(row_to_location).transpose()
    }

    async fn find_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<Option<Location>, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE name = ?");
        let row = self
            .sql
            .run(
                ctx,
                "find_location_by_name",
                sqlx::query(&query).bind(name).fetch_optional(&self.sql.pool),
            )
            .await?;
        row.as_ref().map(row_to_location).transpose()
    }

    async fn list_by_category(
        &self,
        ctx: &RequestContext,
        category: CategoryId,
    ) -> Result<Vec<Location>, RepoError> {
        let user = require_user(ctx, "list_locations_by_category")?;
        let query = format!(
            "SELECT {COLUMNS} FROM locations WHERE user_id = ? AND category_id = ? ORDER BY name"
        );
        let rows = self
            .sql
            .run(
                ctx,
                "list_locations_by_category",
                sqlx::query(&query)
                    .bind(user.to_string())
                    .bind(category.to_string())
                    .fetch_all(&self.sql.pool),
            )
            .await?;
        rows.iter().map(row_to_location).collect()
    }

    async fn update(&self, ctx: &RequestContext, location: &Location) -> Result<(), RepoError> {
        let user = require_user(ctx, "update_location")?;
        self.sql
            .run(
                ctx,
                "update_location",
                sqlx::query(
                    "UPDATE locations SET name = ?, address = ?, category_id = ? \
                     WHERE id = ? AND user_id = ?",
                )
                .bind(location.name.as_str())
                .bind(location.address.as_str())
                .bind(location.category.to_string())
                .bind(location.id.to_string())
                .bind(user.to_string())
                .execute(&self.sql.pool),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, id: LocationId) -> Result<(), RepoError> {
        let user = require_user(ctx, "delete_location")?;
        self.sql
            .run(
                ctx,
                "delete_location",
                sqlx::query("DELETE FROM locations WHERE id = ? AND user_id = ?")
                    .bind(id.to_string())
                    .bind(user.to_string())
                    .execute(&self.sql.pool),
            )
            .await?;
        Ok(())
    }
}

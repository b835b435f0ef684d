//! Category management operations.

use std::sync::Arc;

use placebook_domain::{Category, CategoryId};

use crate::context::RequestContext;
use crate::infrastructure::ports::CategoryRepo;

use super::ManagementError;

pub struct CategoryManagement {
    category: Arc<dyn CategoryRepo>,
}

impl CategoryManagement {
    pub fn new(category: Arc<dyn CategoryRepo>) -> Self {
        Self { category }
    }

    /// Persist a new category. The id is assigned by the caller.
    pub async fn create_category(
        &self,
        ctx: &RequestContext,
        category: Category,
    ) -> Result<Category, ManagementError> {
        let existing = self
            .category
            .find_by_name(ctx, &category.name)
            .await
            .map_err(ManagementError::repo("create_category"))?;
        if existing.is_some() {
            tracing::debug!(name = %category.name, "category name already taken");
            return Err(ManagementError::CategoryAlreadyExists);
        }

        match self.category.create(ctx, &category).await {
            Ok(()) => Ok(category),
            Err(e) if e.is_conflict() => Err(ManagementError::CategoryAlreadyExists),
            Err(e) => Err(ManagementError::repo("create_category")(e)),
        }
    }

    pub async fn get_categories(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<Category>, ManagementError> {
        self.category
            .list(ctx)
            .await
            .map_err(ManagementError::repo("get_categories"))
    }

    pub async fn find_category_by_id(
        &self,
        ctx: &RequestContext,
        id: CategoryId,
    ) -> Result<Category, ManagementError> {
        self.category
            .find_by_id(ctx, id)
            .await
            .map_err(ManagementError::repo("find_category_by_id"))?
            .ok_or(ManagementError::CategoryNotFound)
    }

    /// Replace the stored category with `category` (full record).
    pub async fn update_category(
        &self,
        ctx: &RequestContext,
        category: Category,
    ) -> Result<Category, ManagementError> {
        self.category
            .find_by_id(ctx, category.id)
            .await
            .map_err(ManagementError::repo("update_category"))?
            .ok_or(ManagementError::CategoryNotFound)?;

        match self.category.update(ctx, &category).await {
            Ok(()) => Ok(category),
            Err(e) if e.is_conflict() => Err(ManagementError::CategoryAlreadyExists),
            Err(e) => Err(ManagementError::repo("update_category")(e)),
        }
    }

    pub async fn delete_category(
        &self,
        ctx: &RequestContext,
        id: CategoryId,
    ) -> Result<(), ManagementError> {
        self.category
            .find_by_id(ctx, id)
            .await
            .map_err(ManagementError::repo("delete_category"))?
            .ok_or(ManagementError::CategoryNotFound)?;

        match self.category.delete(ctx, id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_reference_violation() => {
                tracing::debug!(category_id = %id, "category still referenced by locations");
                Err(ManagementError::CategoryInUse)
            }
            Err(e) => Err(ManagementError::repo("delete_category")(e)),
        }
    }
}

//! Location management operations.

use std::sync::Arc;

use placebook_domain::{CategoryId, Location, LocationId};

use crate::context::RequestContext;
use crate::infrastructure::ports::{CategoryRepo, LocationRepo, RepoError};

use super::ManagementError;

pub struct LocationManagement {
    location: Arc<dyn LocationRepo>,
    category: Arc<dyn CategoryRepo>,
}

impl LocationManagement {
    pub fn new(location: Arc<dyn LocationRepo>, category: Arc<dyn CategoryRepo>) -> Self {
        Self { location, category }
    }

    /// Persist a new location.
    ///
    /// The name check runs before the category check, so a duplicate name is
    /// reported even when the category is missing too.
    pub async fn create_location(
        &self,
        ctx: &RequestContext,
        location: Location,
    ) -> Result<Location, ManagementError> {
        const OP: &str = "create_location";

        let existing = self
            .location
            .find_by_name(ctx, &location.name)
            .await
            .map_err(ManagementError::repo(OP))?;
        if existing.is_some() {
            tracing::debug!(name = %location.name, "location name already taken");
            return Err(ManagementError::LocationAlreadyExists);
        }

        self.require_category(ctx, location.category, OP).await?;

        self.location
            .create(ctx, &location)
            .await
            .map_err(|e| classify_location_write(OP, e))?;
        Ok(location)
    }

    /// All locations owned by the context user.
    pub async fn get_locations(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<Location>, ManagementError> {
        self.location
            .list_for_user(ctx)
            .await
            .map_err(ManagementError::repo("get_locations"))
    }

    pub async fn find_location_by_id(
        &self,
        ctx: &RequestContext,
        id: LocationId,
    ) -> Result<Location, ManagementError> {
        self.location
            .find_by_id(ctx, id)
            .await
            .map_err(ManagementError::repo("find_location_by_id"))?
            .ok_or(ManagementError::LocationNotFound)
    }

    pub async fn find_locations_by_category(
        &self,
        ctx: &RequestContext,
        category_id: CategoryId,
    ) -> Result<Vec<Location>, ManagementError> {
        const OP: &str = "find_locations_by_category";

        let category = self.require_category(ctx, category_id, OP).await?;
        self.location
            .list_by_category(ctx, category)
            .await
            .map_err(ManagementError::repo(OP))
    }

    /// Merge `location` onto the stored record and persist the result.
    ///
    /// Empty name/address and a nil category keep the stored values. The
    /// category check is made against the category the merged record will
    /// reference.
    pub async fn update_location(
        &self,
        ctx: &RequestContext,
        location: Location,
    ) -> Result<Location, ManagementError> {
        const OP: &str = "update_location";

        let stored = self
            .location
            .find_by_id(ctx, location.id)
            .await
            .map_err(ManagementError::repo(OP))?
            .ok_or(ManagementError::LocationNotFound)?;

        self.require_category(ctx, location.effective_category(&stored), OP)
            .await?;

        let merged = location.merged_onto(&stored);
        self.location
            .update(ctx, &merged)
            .await
            .map_err(|e| classify_location_write(OP, e))?;
        Ok(merged)
    }

    pub async fn delete_location(
        &self,
        ctx: &RequestContext,
        id: LocationId,
    ) -> Result<(), ManagementError> {
        const OP: &str = "delete_location";

        self.location
            .find_by_id(ctx, id)
            .await
            .map_err(ManagementError::repo(OP))?
            .ok_or(ManagementError::LocationNotFound)?;

        self.location
            .delete(ctx, id)
            .await
            .map_err(ManagementError::repo(OP))
    }

    async fn require_category(
        &self,
        ctx: &RequestContext,
        id: CategoryId,
        operation: &'static str,
    ) -> Result<CategoryId, ManagementError> {
        match self
            .category
            .find_by_id(ctx, id)
            .await
            .map_err(ManagementError::repo(operation))?
        {
            Some(category) => Ok(category.id),
            None => {
                tracing::debug!(category_id = %id, operation, "referenced category not found");
                Err(ManagementError::CategoryNotFound)
            }
        }
    }
}

/// Storage-level constraint failures on a location write mirror the checks
/// made before it: a taken name, or a category deleted in between.
fn classify_location_write(operation: &'static str, err: RepoError) -> ManagementError {
    match err {
        RepoError::Conflict(_) => ManagementError::LocationAlreadyExists,
        RepoError::ReferenceViolation(_) => ManagementError::CategoryNotFound,
        other => ManagementError::repo(operation)(other),
    }
}

//! Repository port traits for database access.
//!
//! Every method takes the request context. Lookups return `Ok(None)` for an
//! absent row; `Err` is reserved for storage failures.

use async_trait::async_trait;
use placebook_domain::{Category, CategoryId, Location, LocationId};

use super::error::RepoError;
use crate::context::RequestContext;

// =============================================================================
// Category Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn create(&self, ctx: &RequestContext, category: &Category) -> Result<(), RepoError>;
    async fn list(&self, ctx: &RequestContext) -> Result<Vec<Category>, RepoError>;
    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: CategoryId,
    ) -> Result<Option<Category>, RepoError>;
    async fn find_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<Option<Category>, RepoError>;
    async fn update(&self, ctx: &RequestContext, category: &Category) -> Result<(), RepoError>;
    async fn delete(&self, ctx: &RequestContext, id: CategoryId) -> Result<(), RepoError>;
}

// =============================================================================
// Location Storage
// =============================================================================

/// Location storage. Reads and writes by id, and the list queries, are
/// scoped to the user carried by the context; `find_by_name` is global.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepo: Send + Sync {
    async fn create(&self, ctx: &RequestContext, location: &Location) -> Result<(), RepoError>;
    async fn list_for_user(&self, ctx: &RequestContext) -> Result<Vec<Location>, RepoError>;
    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: LocationId,
    ) -> Result<Option<Location>, RepoError>;
    async fn find_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<Option<Location>, RepoError>;
    async fn list_by_category(
        &self,
        ctx: &RequestContext,
        category: CategoryId,
    ) -> Result<Vec<Location>, RepoError>;
    async fn update(&self, ctx: &RequestContext, location: &Location) -> Result<(), RepoError>;
    async fn delete(&self, ctx: &RequestContext, id: LocationId) -> Result<(), RepoError>;
}

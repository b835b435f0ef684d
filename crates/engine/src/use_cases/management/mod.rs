//! Management use cases for categories and locations.
//!
//! These use cases keep HTTP handlers thin: handlers decode and validate,
//! use cases perform the existence and uniqueness checks and classify
//! storage outcomes.

mod category;
mod location;

pub use category::CategoryManagement;
pub use location::LocationManagement;

use crate::infrastructure::ports::RepoError;

/// Shared error type for management use cases.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    #[error("category already exists")]
    CategoryAlreadyExists,
    #[error("category not found")]
    CategoryNotFound,
    #[error("category is still referenced by locations")]
    CategoryInUse,
    #[error("location already exists")]
    LocationAlreadyExists,
    #[error("location not found")]
    LocationNotFound,
    /// Storage failure, tagged with the use case operation that hit it.
    #[error("{operation}: {source}")]
    Repo {
        operation: &'static str,
        #[source]
        source: RepoError,
    },
}

impl ManagementError {
    pub(crate) fn repo(operation: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |source| Self::Repo { operation, source }
    }

    /// The wrapped storage error, if this is not a sentinel.
    pub fn repo_error(&self) -> Option<&RepoError> {
        match self {
            Self::Repo { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Container for management use cases.
pub struct ManagementUseCases {
    pub category: CategoryManagement,
    pub location: LocationManagement,
}

impl ManagementUseCases {
    pub fn new(category: CategoryManagement, location: LocationManagement) -> Self {
        Self { category, location }
    }
}

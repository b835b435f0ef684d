//! Application state and composition.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::infrastructure::{
    auth::JwtAuthenticator,
    ports::{CategoryRepo, LocationRepo},
    sqlite::SqliteRepositories,
};
use crate::use_cases::{CategoryManagement, LocationManagement, ManagementUseCases};

/// Main application state.
///
/// Holds the use cases and the collaborators the HTTP layer needs.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
    pub storage: Arc<SqliteRepositories>,
    pub authenticator: Arc<JwtAuthenticator>,
    /// Deadline applied to each request context.
    pub request_timeout: Duration,
    /// Cancelled when in-flight requests must stop; request contexts hold
    /// child tokens.
    pub shutdown: CancellationToken,
}

/// Container for all use cases.
pub struct UseCases {
    pub management: ManagementUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        storage: Arc<SqliteRepositories>,
        authenticator: Arc<JwtAuthenticator>,
        request_timeout: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        let category_repo: Arc<dyn CategoryRepo> = storage.category.clone();
        let location_repo: Arc<dyn LocationRepo> = storage.location.clone();

        let management = ManagementUseCases::new(
            CategoryManagement::new(category_repo.clone()),
            LocationManagement::new(location_repo, category_repo),
        );

        Self {
            use_cases: UseCases { management },
            storage,
            authenticator,
            request_timeout,
            shutdown,
        }
    }
}

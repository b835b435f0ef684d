//! SQLite database implementations.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::context::RequestContext;
use crate::infrastructure::config::SqlConfig;
use crate::infrastructure::ports::RepoError;

mod category_repo;
mod helpers;
mod location_repo;
mod schema;

pub use category_repo::SqliteCategoryRepo;
pub use location_repo::SqliteLocationRepo;

use helpers::SqlExecutor;

const PING_TIMEOUT: Duration = Duration::from_secs(1);

/// All SQLite repositories over one connection pool.
pub struct SqliteRepositories {
    pool: SqlitePool,
    sql: SqlExecutor,
    pub category: Arc<SqliteCategoryRepo>,
    pub location: Arc<SqliteLocationRepo>,
}

impl SqliteRepositories {
    /// Open the pool and apply the schema.
    pub async fn connect(config: &SqlConfig) -> Result<Self, RepoError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| RepoError::database("connect", e))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .min_connections(config.min_connections)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_with(options)
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        schema::ensure_schema(&pool).await?;
        tracing::info!(
            max_connections = config.max_connections,
            "Connected to SQLite"
        );

        let sql = SqlExecutor::new(pool.clone(), config.query_timeout);
        Ok(Self {
            category: Arc::new(SqliteCategoryRepo::new(sql.clone())),
            location: Arc::new(SqliteLocationRepo::new(sql.clone())),
            sql,
            pool,
        })
    }

    /// Readiness probe: a trivial round trip bounded by one second.
    pub async fn ping(&self, ctx: &RequestContext) -> Result<(), RepoError> {
        let ctx = ctx.clone().with_timeout(PING_TIMEOUT);
        self.sql
            .run(&ctx, "ping", sqlx::query("SELECT 1").execute(&self.pool))
            .await?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{CategoryRepo, LocationRepo};
    use placebook_domain::{Category, CategoryId, Location, LocationId, User, UserId};
    use tokio_util::sync::CancellationToken;

    async fn repos() -> SqliteRepositories {
        SqliteRepositories::connect(&SqlConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    fn ctx_for(user: UserId) -> RequestContext {
        RequestContext::background().with_user(User::new(user, "owner@example.com"))
    }

    #[tokio::test]
    async fn category_round_trip() {
        let repos = repos().await;
        let ctx = RequestContext::background();
        let homes = Category::new("Homes");

        repos.category.create(&ctx, &homes).await.expect("insert");

        let by_id = repos.category.find_by_id(&ctx, homes.id).await.expect("query");
        assert_eq!(by_id, Some(homes.clone()));
        let by_name = repos.category.find_by_name(&ctx, "Homes").await.expect("query");
        assert_eq!(by_name, Some(homes.clone()));
        assert!(repos
            .category
            .find_by_id(&ctx, CategoryId::new())
            .await
            .expect("query")
            .is_none());

        let renamed = Category::with_id(homes.id, "Houses");
        repos.category.update(&ctx, &renamed).await.expect("update");
        assert_eq!(repos.category.list(&ctx).await.expect("list"), vec![renamed]);

        repos.category.delete(&ctx, homes.id).await.expect("delete");
        assert!(repos.category.list(&ctx).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn duplicate_category_name_is_conflict() {
        let repos = repos().await;
        let ctx = RequestContext::background();

        repos
            .category
            .create(&ctx, &Category::new("Homes"))
            .await
            .expect("first insert");
        let err = repos
            .category
            .create(&ctx, &Category::new("Homes"))
            .await
            .expect_err("second insert");

        assert!(err.is_conflict(), "{err:?}");
    }

    #[tokio::test]
    async fn referenced_category_cannot_be_deleted() {
        let repos = repos().await;
        let user = UserId::new();
        let ctx = ctx_for(user);
        let homes = Category::new("Homes");
        repos.category.create(&ctx, &homes).await.expect("category");
        repos
            .location
            .create(&ctx, &Location::new("Home", "1 rue de la Poste", homes.id, user))
            .await
            .expect("location");

        let err = repos
            .category
            .delete(&ctx, homes.id)
            .await
            .expect_err("still referenced");

        assert!(err.is_reference_violation(), "{err:?}");
    }

    #[tokio::test]
    async fn location_with_unknown_category_is_reference_violation() {
        let repos = repos().await;
        let user = UserId::new();

        let err = repos
            .location
            .create(
                &ctx_for(user),
                &Location::new("Home", "1 rue de la Poste", CategoryId::new(), user),
            )
            .await
            .expect_err("dangling category");

        assert!(err.is_reference_violation(), "{err:?}");
    }

    #[tokio::test]
    async fn locations_are_scoped_to_their_owner() {
        let repos = repos().await;
        let owner = UserId::new();
        let stranger = UserId::new();
        let homes = Category::new("Homes");
        repos
            .category
            .create(&ctx_for(owner), &homes)
            .await
            .expect("category");
        let home = Location::new("Home", "1 rue de la Poste", homes.id, owner);
        repos
            .location
            .create(&ctx_for(owner), &home)
            .await
            .expect("location");

        let mine = repos.location.list_for_user(&ctx_for(owner)).await.expect("list");
        assert_eq!(mine, vec![home.clone()]);
        let by_category = repos
            .location
            .list_by_category(&ctx_for(owner), homes.id)
            .await
            .expect("list");
        assert_eq!(by_category, vec![home.clone()]);

        let theirs = repos
            .location
            .list_for_user(&ctx_for(stranger))
            .await
            .expect("list");
        assert!(theirs.is_empty());
        assert!(repos
            .location
            .find_by_id(&ctx_for(stranger), home.id)
            .await
            .expect("query")
            .is_none());

        // Name lookups are global
        let by_name = repos
            .location
            .find_by_name(&ctx_for(stranger), "Home")
            .await
            .expect("query");
        assert_eq!(by_name, Some(home.clone()));

        // A stranger's delete touches nothing
        repos
            .location
            .delete(&ctx_for(stranger), home.id)
            .await
            .expect("delete");
        assert_eq!(
            repos
                .location
                .find_by_id(&ctx_for(owner), home.id)
                .await
                .expect("query"),
            Some(home)
        );
    }

    #[tokio::test]
    async fn location_update_and_delete() {
        let repos = repos().await;
        let user = UserId::new();
        let ctx = ctx_for(user);
        let homes = Category::new("Homes");
        let offices = Category::new("Offices");
        repos.category.create(&ctx, &homes).await.expect("category");
        repos.category.create(&ctx, &offices).await.expect("category");
        let home = Location::new("Home", "1 rue de la Poste", homes.id, user);
        repos.location.create(&ctx, &home).await.expect("location");

        let moved = Location {
            address: "2 rue du Port".into(),
            category: offices.id,
            ..home.clone()
        };
        repos.location.update(&ctx, &moved).await.expect("update");
        assert_eq!(
            repos.location.find_by_id(&ctx, home.id).await.expect("query"),
            Some(moved)
        );

        repos.location.delete(&ctx, home.id).await.expect("delete");
        assert!(repos
            .location
            .find_by_id(&ctx, home.id)
            .await
            .expect("query")
            .is_none());
    }

    #[tokio::test]
    async fn user_scoped_queries_require_a_principal() {
        let repos = repos().await;
        let ctx = RequestContext::background();

        let err = repos
            .location
            .find_by_id(&ctx, LocationId::new())
            .await
            .expect_err("no user");
        assert!(matches!(err, RepoError::MissingPrincipal { .. }));
        assert!(matches!(
            repos.location.list_for_user(&ctx).await,
            Err(RepoError::MissingPrincipal { .. })
        ));
    }

    #[tokio::test]
    async fn cancelled_context_short_circuits() {
        let repos = repos().await;
        let token = CancellationToken::new();
        token.cancel();
        let ctx = RequestContext::background().with_cancellation(token);

        let err = repos.category.list(&ctx).await.expect_err("cancelled");
        assert!(matches!(err, RepoError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn expired_deadline_issues_no_statement() {
        let repos = repos().await;
        let expired = RequestContext::background().with_timeout(Duration::ZERO);

        let err = repos
            .category
            .create(&expired, &Category::new("Homes"))
            .await
            .expect_err("deadline passed");
        assert!(err.is_timeout(), "{err:?}");
        assert!(matches!(
            repos.category.list(&expired).await,
            Err(RepoError::Timeout { .. })
        ));

        let listed = repos
            .category
            .list(&RequestContext::background())
            .await
            .expect("list");
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn cancelled_context_writes_nothing() {
        let repos = repos().await;
        let token = CancellationToken::new();
        token.cancel();
        let ctx = RequestContext::background().with_cancellation(token);

        let err = repos
            .category
            .create(&ctx, &Category::new("Homes"))
            .await
            .expect_err("cancelled");
        assert!(matches!(err, RepoError::Cancelled { .. }));

        let listed = repos
            .category
            .list(&RequestContext::background())
            .await
            .expect("list");
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn ping_and_close() {
        let repos = repos().await;
        repos
            .ping(&RequestContext::background())
            .await
            .expect("ping");
        repos.close().await;
        assert!(repos.ping(&RequestContext::background()).await.is_err());
    }

    #[tokio::test]
    async fn file_backed_database_persists_across_pools() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("placebook.db");
        let config = SqlConfig {
            url: format!("sqlite:{}", path.display()),
            max_connections: 2,
            min_connections: 0,
            ..SqlConfig::in_memory()
        };
        let homes = Category::new("Homes");

        let first = SqliteRepositories::connect(&config).await.expect("open");
        first
            .category
            .create(&RequestContext::background(), &homes)
            .await
            .expect("insert");
        first.close().await;

        let second = SqliteRepositories::connect(&config).await.expect("reopen");
        let listed = second
            .category
            .list(&RequestContext::background())
            .await
            .expect("list");
        assert_eq!(listed, vec![homes]);
    }
}

//! Shared plumbing for the SQLite repositories: deadline guard, error
//! classification and row decoding helpers.

use std::future::Future;
use std::time::{Duration, Instant};

use placebook_domain::UserId;
use sqlx::SqlitePool;

use crate::context::RequestContext;
use crate::infrastructure::ports::RepoError;

/// Pool handle plus the per-query time budget.
#[derive(Clone)]
pub(super) struct SqlExecutor {
    pub(super) pool: SqlitePool,
    query_timeout: Duration,
}

impl SqlExecutor {
    pub(super) fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Run `query` under `min(query_timeout, ctx remaining)` and the context
    /// cancellation token.
    pub(super) async fn run<T, F>(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        query: F,
    ) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        // Never issue a statement once the request is over
        if ctx.is_cancelled() {
            return Err(RepoError::Cancelled { operation });
        }
        let budget = match ctx.remaining() {
            Some(Duration::ZERO) => return Err(RepoError::Timeout { operation }),
            Some(left) => left.min(self.query_timeout),
            None => self.query_timeout,
        };
        let started = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => Err(RepoError::Cancelled { operation }),
            res = tokio::time::timeout(budget, query) => match res {
                Ok(res) => res.map_err(|e| classify(operation, e)),
                Err(_) => Err(RepoError::Timeout { operation }),
            },
        };

        tracing::debug!(
            operation,
            duration_ms = started.elapsed().as_millis() as u64,
            ok = outcome.is_ok(),
            "sql query"
        );
        outcome
    }
}

/// Map driver errors onto the port error, keeping constraint failures
/// distinguishable.
pub(super) fn classify(operation: &'static str, err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepoError::conflict(db.message());
        }
        if db.is_foreign_key_violation() {
            return RepoError::reference_violation(db.message());
        }
    }
    RepoError::database(operation, err)
}

/// The principal of a user-scoped query.
pub(super) fn require_user(
    ctx: &RequestContext,
    operation: &'static str,
) -> Result<UserId, RepoError> {
    ctx.user()
        .map(|user| user.id)
        .ok_or(RepoError::MissingPrincipal { operation })
}

/// Decode a stored identifier column.
pub(super) fn decode_id<T>(raw: &str) -> Result<T, RepoError>
where
    T: std::str::FromStr<Err = placebook_domain::DomainError>,
{
    raw.parse().map_err(RepoError::serialization)
}

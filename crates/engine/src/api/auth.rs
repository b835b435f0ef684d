//! Authentication middleware and the per-request context extractor.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use placebook_domain::User;

use crate::app::App;
use crate::context::RequestContext;
use crate::infrastructure::auth::AuthError;

use super::error::ApiError;

/// Verify the bearer token and attach the resolved [`User`] to the request.
pub async fn require_auth(
    State(app): State<Arc<App>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = extract_bearer(req.headers())
        .and_then(|token| app.authenticator.authenticate(token))
        .map_err(|e| {
            tracing::debug!(error = %e, "authentication failed");
            ApiError::Unauthorized
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();

    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}

/// The [`RequestContext`] of the current request: the authenticated user
/// (when the route is behind [`require_auth`]), the configured request
/// deadline and a token cancelled on server shutdown.
pub struct RequestCtx(pub RequestContext);

impl FromRequestParts<Arc<App>> for RequestCtx {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        app: &Arc<App>,
    ) -> Result<Self, Self::Rejection> {
        let mut ctx = RequestContext::background()
            .with_timeout(app.request_timeout)
            .with_cancellation(app.shutdown.child_token());
        if let Some(user) = parts.extensions.get::<User>() {
            ctx = ctx.with_user(user.clone());
        }
        Ok(Self(ctx))
    }
}

//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use placebook_shared::ErrorResponse;

use crate::infrastructure::ports::RepoError;
use crate::use_cases::validation::ValidationError;
use crate::use_cases::ManagementError;

#[derive(Debug)]
pub enum ApiError {
    /// Missing or rejected credentials
    Unauthorized,
    BadRequest(String),
    NotFound(&'static str),
    Conflict(&'static str),
    /// Storage or dependency not ready
    Unavailable(String),
    /// A wrapped storage failure; logged once when rendered
    Internal(ManagementError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(err) => match err.repo_error() {
                Some(RepoError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Unauthorized => "invalid auth".to_string(),
            Self::BadRequest(msg) | Self::Unavailable(msg) => msg.clone(),
            Self::NotFound(msg) | Self::Conflict(msg) => (*msg).to_string(),
            Self::Internal(ManagementError::Repo { operation, .. }) => {
                format!("Failed to {}", operation.replace('_', " "))
            }
            Self::Internal(_) => "Internal error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(err) = &self {
            tracing::error!(error = %err, status = status.as_u16(), "request failed");
        }
        let body = ErrorResponse::new(status.as_u16(), self.message());
        (status, Json(body)).into_response()
    }
}

impl From<ManagementError> for ApiError {
    fn from(err: ManagementError) -> Self {
        match err {
            ManagementError::CategoryAlreadyExists => {
                Self::BadRequest("Category already exists".to_string())
            }
            ManagementError::LocationAlreadyExists => {
                Self::BadRequest("Location already exists".to_string())
            }
            ManagementError::CategoryNotFound => Self::NotFound("Category not found"),
            ManagementError::LocationNotFound => Self::NotFound("Location not found"),
            ManagementError::CategoryInUse => Self::Conflict("Category is used by locations"),
            ManagementError::Repo {
                source: RepoError::MissingPrincipal { .. },
                ..
            } => Self::Unauthorized,
            other => Self::Internal(other),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: ApiError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    #[tokio::test]
    async fn sentinels_map_to_client_errors() {
        let cases = [
            (ManagementError::CategoryAlreadyExists, StatusCode::BAD_REQUEST),
            (ManagementError::LocationAlreadyExists, StatusCode::BAD_REQUEST),
            (ManagementError::CategoryNotFound, StatusCode::NOT_FOUND),
            (ManagementError::LocationNotFound, StatusCode::NOT_FOUND),
            (ManagementError::CategoryInUse, StatusCode::CONFLICT),
        ];
        for (err, expected) in cases {
            let (status, body) = render(err.into()).await;
            assert_eq!(status, expected);
            assert_eq!(body.code, expected.as_u16());
        }
    }

    #[tokio::test]
    async fn wrapped_failures_hide_details() {
        let err = ManagementError::Repo {
            operation: "create_category",
            source: RepoError::database("insert_category", "disk I/O error at /var/db"),
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Failed to create category");
    }

    #[tokio::test]
    async fn timeouts_are_gateway_timeouts() {
        let err = ManagementError::Repo {
            operation: "get_locations",
            source: RepoError::Timeout { operation: "list_locations" },
        };
        let (status, _) = render(err.into()).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn unauthorized_body_matches_wire_format() {
        let (status, body) = render(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, ErrorResponse::new(401, "invalid auth"));
    }
}

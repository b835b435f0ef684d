//! Response bodies produced by the HTTP API.

use serde::{Deserialize, Serialize};

/// A category as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
}

/// A location as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: String,
    pub name: String,
    pub address: String,
    pub category_id: String,
    pub user_id: String,
}

/// Error body: `{ "code": <http status>, "message": <text> }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

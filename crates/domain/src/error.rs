//! Unified error type for the domain layer.

use thiserror::Error;

/// Errors raised while parsing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Identifier text does not follow the canonical grammar
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}

impl DomainError {
    /// Create an invalid ID error
    ///
    /// # Example
    /// ```
    /// use placebook_domain::DomainError;
    ///
    /// let err = DomainError::invalid_id("malformed identifier: abc");
    /// assert_eq!(err.to_string(), "Invalid ID format: malformed identifier: abc");
    /// ```
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

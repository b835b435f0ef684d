//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// A uniqueness constraint rejected the write.
    #[error("Constraint conflict: {0}")]
    Conflict(String),

    /// A foreign key constraint rejected the write or delete.
    #[error("Reference violation: {0}")]
    ReferenceViolation(String),

    /// Stored data could not be decoded into domain values.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A user-scoped operation ran without an authenticated principal.
    #[error("No authenticated user for {operation}")]
    MissingPrincipal { operation: &'static str },

    /// The request deadline or the query timeout elapsed.
    #[error("Timed out in {operation}")]
    Timeout { operation: &'static str },

    /// The request was cancelled before the operation finished.
    #[error("Cancelled in {operation}")]
    Cancelled { operation: &'static str },
}

impl RepoError {
    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict(message.to_string())
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn reference_violation(message: impl ToString) -> Self {
        Self::ReferenceViolation(message.to_string())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn is_reference_violation(&self) -> bool {
        matches!(self, Self::ReferenceViolation(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

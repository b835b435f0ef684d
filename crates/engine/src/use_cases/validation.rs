//! Common validation helpers for inbound requests.

use std::str::FromStr;

use placebook_domain::DomainError;

/// Validation error type.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{field_name} cannot be empty")]
    Empty { field_name: &'static str },

    #[error("{field_name} is invalid: {reason}")]
    Invalid { field_name: &'static str, reason: String },

    #[error("at least one field must be provided")]
    NothingToUpdate,
}

/// Validate a string is non-empty after trimming.
pub fn require_non_empty(value: &str, field_name: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field_name });
    }
    Ok(())
}

/// Validate an optional string is non-empty if present.
pub fn require_non_empty_if_present(
    value: &Option<String>,
    field_name: &'static str,
) -> Result<(), ValidationError> {
    if let Some(v) = value {
        require_non_empty(v, field_name)?;
    }
    Ok(())
}

/// Parse an identifier. Empty text yields the nil id.
pub fn parse_id<T>(value: &str, field_name: &'static str) -> Result<T, ValidationError>
where
    T: FromStr<Err = DomainError>,
{
    value.parse().map_err(|e: DomainError| ValidationError::Invalid {
        field_name,
        reason: e.to_string(),
    })
}

/// Parse an identifier that must reference something: nil is rejected.
pub fn require_id<T>(value: &str, field_name: &'static str) -> Result<T, ValidationError>
where
    T: FromStr<Err = DomainError> + Default + PartialEq,
{
    let id: T = parse_id(value, field_name)?;
    if id == T::default() {
        return Err(ValidationError::Empty { field_name });
    }
    Ok(id)
}

//! Core domain model of the location service: identifiers, entities and the
//! domain error type. This crate has no I/O dependencies.

pub mod entities;
pub mod error;
pub mod ids;

pub use entities::{Category, Location, User};
pub use error::DomainError;
pub use ids::{CategoryId, LocationId, UserId};

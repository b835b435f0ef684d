//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (SQLite today, any SQL store tomorrow)
//! - Clock (token expiry checks)

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::{CategoryRepo, LocationRepo};
pub use testing::ClockPort;

#[cfg(test)]
pub use repos::{MockCategoryRepo, MockLocationRepo};
#[cfg(test)]
pub use testing::MockClockPort;

//! Use cases - User story orchestration.
//!
//! Use cases enforce the business invariants (unique names, category
//! references, ownership scoping) on top of the repository ports.

pub mod management;
pub mod validation;

pub use management::{CategoryManagement, LocationManagement, ManagementError, ManagementUseCases};

//! Placebook Shared - Wire types of the HTTP API
//!
//! Pure data types and serialization, no business logic. Identifiers travel
//! as their canonical string form; the engine parses them into domain ids.

pub mod requests;
pub mod responses;

pub use requests::{
    CreateCategoryRequest, CreateLocationRequest, LocationsQuery, UpdateCategoryRequest,
    UpdateLocationRequest,
};
pub use responses::{CategoryResponse, ErrorResponse, LocationResponse};

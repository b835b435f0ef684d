//! Placebook Engine library.
//!
//! Server-side code of the location service.
//!
//! ## Structure
//!
//! - `context` - Per-request context (principal, deadline, cancellation)
//! - `use_cases/` - Business rules over the repository ports
//! - `infrastructure/` - Ports, SQLite adapter, configuration, token verification
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod context;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use context::RequestContext;

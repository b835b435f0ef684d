//! Domain entities - Core business objects with identity

mod category;
mod location;
mod user;

pub use category::Category;
pub use location::Location;
pub use user::User;

//! Category entity - Classification tag shared by every user's locations

use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;

/// A named classification for locations.
///
/// Categories are global: they have no owner and their names are unique
/// across the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Create a category with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(CategoryId::new(), name)
    }

    pub fn with_id(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_assigns_fresh_id() {
        let a = Category::new("Homes");
        let b = Category::new("Homes");
        assert!(!a.id.is_nil());
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Homes");
    }

    #[test]
    fn serializes_with_string_id() {
        let id = CategoryId::parse("550e8400-e29b-41d4-a716-446655440000").expect("valid id");
        let category = Category::with_id(id, "Homes");
        let json = serde_json::to_value(&category).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "name": "Homes",
            })
        );
    }
}

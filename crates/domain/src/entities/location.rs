//! Location entity - A physical place owned by a user
//!
//! Each location references exactly one category. Names are unique across
//! all users; reads and mutations are scoped to the owner by the storage
//! adapter.

use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, LocationId, UserId};

/// A named place with a postal address.
///
/// Simple data struct with public fields. Partial updates are expressed as a
/// `Location` whose empty strings and nil ids mean "keep the stored value";
/// see [`Location::merged_onto`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub address: String,
    #[serde(rename = "category_id")]
    pub category: CategoryId,
    #[serde(rename = "user_id")]
    pub user: UserId,
}

impl Location {
    /// Create a location with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        category: CategoryId,
        user: UserId,
    ) -> Self {
        Self {
            id: LocationId::new(),
            name: name.into(),
            address: address.into(),
            category,
            user,
        }
    }

    /// The category this update will end up referencing once merged onto
    /// `stored`.
    pub fn effective_category(&self, stored: &Location) -> CategoryId {
        if self.category.is_nil() {
            stored.category
        } else {
            self.category
        }
    }

    /// Apply this partial update onto the stored record.
    ///
    /// Empty `name`/`address` and a nil `category` take the stored value.
    /// Identity and owner always come from `stored`.
    pub fn merged_onto(self, stored: &Location) -> Location {
        let category = self.effective_category(stored);
        Location {
            id: stored.id,
            name: if self.name.is_empty() {
                stored.name.clone()
            } else {
                self.name
            },
            address: if self.address.is_empty() {
                stored.address.clone()
            } else {
                self.address
            },
            category,
            user: stored.user,
        }
    }
}

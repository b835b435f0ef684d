//! Request bodies and query strings accepted by the HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/categories`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// Body of `PUT /api/v1/categories/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
}

/// Body of `POST /api/v1/locations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocationRequest {
    pub name: String,
    pub address: String,
    pub category_id: String,
}

/// Body of `PUT /api/v1/locations/{id}`
///
/// Absent fields keep the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLocationRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

impl UpdateLocationRequest {
    /// True when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.category_id.is_none()
    }
}

/// Query string of `GET /api/v1/locations`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationsQuery {
    #[serde(default)]
    pub category_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_location_fields_are_optional() {
        let req: UpdateLocationRequest =
            serde_json::from_str(r#"{"address":"2 rue du Port"}"#).expect("deserialize");
        assert_eq!(req.address.as_deref(), Some("2 rue du Port"));
        assert!(req.name.is_none());
        assert!(!req.is_empty());

        let empty: UpdateLocationRequest = serde_json::from_str("{}").expect("deserialize");
        assert!(empty.is_empty());
    }

    #[test]
    fn create_location_requires_all_fields() {
        let result = serde_json::from_str::<CreateLocationRequest>(r#"{"name":"Home"}"#);
        assert!(result.is_err());
    }
}

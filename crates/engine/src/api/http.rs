//! HTTP routes.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use placebook_domain::{Category, CategoryId, Location, LocationId};
use placebook_shared::{
    CategoryResponse, CreateCategoryRequest, CreateLocationRequest, LocationResponse,
    LocationsQuery, UpdateCategoryRequest, UpdateLocationRequest,
};

use super::auth::{require_auth, RequestCtx};
use super::error::ApiError;
use crate::app::App;
use crate::use_cases::validation::{
    parse_id, require_id, require_non_empty, require_non_empty_if_present, ValidationError,
};

/// Create all HTTP routes, bound to `app`.
pub fn router(app: Arc<App>) -> Router {
    let api = Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/locations", get(list_locations).post(create_location))
        .route(
            "/locations/{id}",
            get(get_location).put(update_location).delete(delete_location),
        )
        .route_layer(middleware::from_fn_with_state(app.clone(), require_auth));

    Router::new()
        .route("/ping", get(ping))
        .route("/ready", get(ready))
        .nest("/api/v1", api)
        .with_state(app)
}

async fn ping() -> Json<()> {
    Json(())
}

async fn ready(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
) -> Result<StatusCode, ApiError> {
    app.storage.ping(&ctx).await.map_err(|e| {
        tracing::warn!(error = %e, "readiness check failed");
        ApiError::Unavailable("Storage unavailable".to_string())
    })?;
    Ok(StatusCode::OK)
}

// =============================================================================
// Categories
// =============================================================================

async fn create_category(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
    body: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let Json(body) = body.map_err(invalid_body)?;
    require_non_empty(&body.name, "name")?;

    let category = app
        .use_cases
        .management
        .category
        .create_category(&ctx, Category::new(body.name))
        .await?;
    Ok(Json(category_response(category)))
}

async fn list_categories(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = app.use_cases.management.category.get_categories(&ctx).await?;
    Ok(Json(categories.into_iter().map(category_response).collect()))
}

async fn get_category(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let id: CategoryId = path_id(&id)?;
    let category = app
        .use_cases
        .management
        .category
        .find_category_by_id(&ctx, id)
        .await?;
    Ok(Json(category_response(category)))
}

async fn update_category(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
    Path(id): Path<String>,
    body: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let id: CategoryId = path_id(&id)?;
    let Json(body) = body.map_err(invalid_body)?;
    require_non_empty(&body.name, "name")?;

    let category = app
        .use_cases
        .management
        .category
        .update_category(&ctx, Category::with_id(id, body.name))
        .await?;
    Ok(Json(category_response(category)))
}

async fn delete_category(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: CategoryId = path_id(&id)?;
    app.use_cases
        .management
        .category
        .delete_category(&ctx, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Locations
// =============================================================================

async fn create_location(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
    body: Result<Json<CreateLocationRequest>, JsonRejection>,
) -> Result<Json<LocationResponse>, ApiError> {
    let Json(body) = body.map_err(invalid_body)?;
    require_non_empty(&body.name, "name")?;
    require_non_empty(&body.address, "address")?;
    let category: CategoryId = require_id(&body.category_id, "category_id")?;
    let user = ctx.user().map(|u| u.id).ok_or(ApiError::Unauthorized)?;

    let location = app
        .use_cases
        .management
        .location
        .create_location(&ctx, Location::new(body.name, body.address, category, user))
        .await?;
    Ok(Json(location_response(location)))
}

async fn list_locations(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
    query: Result<Query<LocationsQuery>, QueryRejection>,
) -> Result<Json<Vec<LocationResponse>>, ApiError> {
    let Query(query) = query.map_err(|e| {
        tracing::debug!(error = %e, "invalid query string");
        ApiError::BadRequest("Invalid query".to_string())
    })?;
    let category: CategoryId = parse_id(query.category_id.as_deref().unwrap_or(""), "category_id")?;

    let management = &app.use_cases.management.location;
    let locations = if category.is_nil() {
        management.get_locations(&ctx).await?
    } else {
        management.find_locations_by_category(&ctx, category).await?
    };
    Ok(Json(locations.into_iter().map(location_response).collect()))
}

async fn get_location(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
    Path(id): Path<String>,
) -> Result<Json<LocationResponse>, ApiError> {
    let id: LocationId = path_id(&id)?;
    let location = app
        .use_cases
        .management
        .location
        .find_location_by_id(&ctx, id)
        .await?;
    Ok(Json(location_response(location)))
}

async fn update_location(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
    Path(id): Path<String>,
    body: Result<Json<UpdateLocationRequest>, JsonRejection>,
) -> Result<Json<LocationResponse>, ApiError> {
    let id: LocationId = path_id(&id)?;
    let Json(body) = body.map_err(invalid_body)?;
    if body.is_empty() {
        return Err(ValidationError::NothingToUpdate.into());
    }
    require_non_empty_if_present(&body.name, "name")?;
    require_non_empty_if_present(&body.address, "address")?;
    let category: CategoryId = match body.category_id.as_deref() {
        Some(raw) => require_id(raw, "category_id")?,
        None => CategoryId::nil(),
    };

    // Empty strings and the nil id mean "keep the stored value"
    let patch = Location {
        id,
        name: body.name.unwrap_or_default(),
        address: body.address.unwrap_or_default(),
        category,
        user: Default::default(),
    };
    let location = app
        .use_cases
        .management
        .location
        .update_location(&ctx, patch)
        .await?;
    Ok(Json(location_response(location)))
}

async fn delete_location(
    State(app): State<Arc<App>>,
    RequestCtx(ctx): RequestCtx,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: LocationId = path_id(&id)?;
    app.use_cases
        .management
        .location
        .delete_location(&ctx, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

fn invalid_body(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "invalid request body");
    ApiError::BadRequest("Invalid body".to_string())
}

/// Path ids must be concrete: empty or nil ids are rejected like malformed ones.
fn path_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: std::str::FromStr<Err = placebook_domain::DomainError> + Default + PartialEq,
{
    require_id(raw, "id").map_err(|e| {
        tracing::debug!(error = %e, "invalid path id");
        ApiError::BadRequest("Invalid query".to_string())
    })
}

fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id.to_string(),
        name: category.name,
    }
}

fn location_response(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id.to_string(),
        name: location.name,
        address: location.address,
        category_id: location.category.to_string(),
        user_id: location.user.to_string(),
    }
}

//! Property API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    BulkDeleteRequest, CreatePropertyRequest, DeleteOutcome, Property, PropertyFilter,
    UpdatePropertyRequest,
};
use crate::AppState;

/// GET /api/properties - List properties, newest first, with optional filters.
pub async fn list_properties(
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> ApiResult<Vec<Property>> {
    success(state.catalog.search(&filter).await?)
}

/// GET /api/properties/:id - Get a single property.
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Property> {
    success(state.catalog.get(&id).await?)
}

/// POST /api/properties - Create a new property.
pub async fn create_property(
    State(state): State<AppState>,
    Json(request): Json<CreatePropertyRequest>,
) -> ApiResult<Property> {
    success(state.catalog.create(&request).await?)
}

/// PUT /api/properties/:id - Update a property.
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePropertyRequest>,
) -> ApiResult<Property> {
    success(state.catalog.update(&id, &request).await?)
}

/// POST /api/properties/:id/availability - Flip between available and taken.
pub async fn toggle_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Property> {
    success(state.catalog.toggle_availability(&id).await?)
}

/// DELETE /api/properties/:id - Delete a property and its hosted media.
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.catalog.delete(&id).await?;
    success(())
}

/// POST /api/properties/bulk-delete - Delete several properties independently.
pub async fn bulk_delete_properties(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> ApiResult<Vec<DeleteOutcome>> {
    if request.ids.is_empty() {
        return Err(AppError::Validation("No property ids given".to_string()));
    }

    success(state.catalog.delete_many(&request.ids).await)
}

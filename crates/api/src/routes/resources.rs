//! Resource inventory routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use farmstead_core::{
    dashboard::is_low_stock,
    domain::ResourceType,
    validation::{MAX_UNIT_LENGTH, non_negative, optional_text_max, require_text},
};
use farmstead_db::{
    AllocationInput, AllocationWithActivity, ResourceInput, ResourceRepository,
    entities::resources,
};
use farmstead_shared::types::{ActivityId, ResourceId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Creates the resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/resources", get(list_resources).post(create_resource))
        .route(
            "/resources/{id}",
            get(get_resource)
                .put(update_resource)
                .delete(delete_resource),
        )
        .route("/resources/{id}/allocations", get(list_allocations))
}

/// Request body for creating or replacing a resource.
#[derive(Debug, Deserialize)]
pub struct ResourceRequest {
    /// Resource name.
    pub name: String,
    /// Units on hand, 0 when omitted.
    pub quantity: Option<i32>,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Inventory or human, inventory when omitted.
    pub resource_type: Option<ResourceType>,
    /// Low-stock threshold, 0 (disabled) when omitted.
    pub threshold: Option<i32>,
    /// Activity to allocate this resource to.
    pub activity_id: Option<ActivityId>,
    /// Quantity allocated to that activity.
    pub allocated_quantity: Option<i32>,
}

impl ResourceRequest {
    fn validate(self) -> ApiResult<(ResourceInput, Option<AllocationInput>)> {
        let input = ResourceInput {
            name: require_text("name", &self.name)?,
            quantity: non_negative("quantity", self.quantity.unwrap_or(0))?,
            unit: optional_text_max("unit", self.unit.as_deref(), MAX_UNIT_LENGTH)?,
            resource_type: self.resource_type.unwrap_or_default(),
            threshold: non_negative("threshold", self.threshold.unwrap_or(0))?,
        };

        let allocation = match self.activity_id {
            Some(activity_id) => Some(AllocationInput {
                activity_id,
                allocated_quantity: non_negative(
                    "allocated_quantity",
                    self.allocated_quantity.unwrap_or(0),
                )?,
            }),
            None => None,
        };

        Ok((input, allocation))
    }
}

/// Resource with its low-stock flag.
#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    /// Stored resource.
    #[serde(flatten)]
    pub resource: resources::Model,
    /// Quantity at or below a non-zero threshold.
    pub low_stock: bool,
}

impl From<resources::Model> for ResourceResponse {
    fn from(resource: resources::Model) -> Self {
        let low_stock = is_low_stock(resource.quantity, resource.threshold);
        Self {
            resource,
            low_stock,
        }
    }
}

/// POST /resources
async fn create_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<ResourceRequest>,
) -> ApiResult<(StatusCode, Json<ResourceResponse>)> {
    auth.require_admin()?;
    let (input, allocation) = payload.validate()?;

    let resource = ResourceRepository::new((*state.db).clone())
        .create(input, allocation)
        .await?;

    info!(resource_id = %resource.id, name = %resource.name, "Resource created");
    Ok((StatusCode::CREATED, Json(resource.into())))
}

/// GET /resources
async fn list_resources(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<ResourceResponse>>> {
    let resources = ResourceRepository::new((*state.db).clone()).list().await?;
    Ok(Json(resources.into_iter().map(Into::into).collect()))
}

/// GET /resources/{id}
async fn get_resource(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<ResourceId>,
) -> ApiResult<Json<ResourceResponse>> {
    let resource = ResourceRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("resource not found"))?;
    Ok(Json(resource.into()))
}

/// PUT /resources/{id}
async fn update_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<ResourceId>,
    ApiJson(payload): ApiJson<ResourceRequest>,
) -> ApiResult<Json<ResourceResponse>> {
    auth.require_admin()?;
    let (input, allocation) = payload.validate()?;

    let resource = ResourceRepository::new((*state.db).clone())
        .update(id, input, allocation)
        .await?;
    Ok(Json(resource.into()))
}

/// DELETE /resources/{id}
async fn delete_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<ResourceId>,
) -> ApiResult<StatusCode> {
    auth.require_admin()?;
    ResourceRepository::new((*state.db).clone())
        .delete(id)
        .await?;
    info!(resource_id = %id, "Resource deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /resources/{id}/allocations
async fn list_allocations(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<ResourceId>,
) -> ApiResult<Json<Vec<AllocationWithActivity>>> {
    let allocations = ResourceRepository::new((*state.db).clone())
        .allocations(id)
        .await?;
    Ok(Json(allocations))
}

//! Branch routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use farmstead_core::validation::require_text;
use farmstead_db::{BranchRepository, BranchWithUserCount, UpdateBranchInput, entities::branches};
use farmstead_shared::types::BranchId;
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiResult,
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Creates the branch routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/branches", get(list_branches).post(create_branch))
        .route("/branches/{id}", patch(update_branch).delete(delete_branch))
}

/// Request body for creating a branch.
#[derive(Debug, Deserialize)]
pub struct CreateBranchRequest {
    /// Unique branch name.
    pub name: String,
    /// Branch location.
    pub location: String,
}

/// Request body for updating a branch.
#[derive(Debug, Deserialize)]
pub struct UpdateBranchRequest {
    /// New name.
    pub name: Option<String>,
    /// New location.
    pub location: Option<String>,
}

/// POST /branches
async fn create_branch(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateBranchRequest>,
) -> ApiResult<(StatusCode, Json<branches::Model>)> {
    auth.require_admin()?;
    let name = require_text("name", &payload.name)?;
    let location = require_text("location", &payload.location)?;

    let branch = BranchRepository::new((*state.db).clone())
        .create(&name, &location)
        .await?;

    info!(branch_id = %branch.id, name = %branch.name, "Branch created");
    Ok((StatusCode::CREATED, Json(branch)))
}

/// GET /branches
async fn list_branches(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<BranchWithUserCount>>> {
    let branches = BranchRepository::new((*state.db).clone())
        .list_with_user_count()
        .await?;
    Ok(Json(branches))
}

/// PATCH /branches/{id}
async fn update_branch(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<BranchId>,
    ApiJson(payload): ApiJson<UpdateBranchRequest>,
) -> ApiResult<Json<branches::Model>> {
    auth.require_admin()?;
    let input = UpdateBranchInput {
        name: payload
            .name
            .as_deref()
            .map(|n| require_text("name", n))
            .transpose()?,
        location: payload
            .location
            .as_deref()
            .map(|l| require_text("location", l))
            .transpose()?,
    };

    let branch = BranchRepository::new((*state.db).clone())
        .update(id, input)
        .await?;
    Ok(Json(branch))
}

/// DELETE /branches/{id}
async fn delete_branch(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<BranchId>,
) -> ApiResult<StatusCode> {
    auth.require_admin()?;
    BranchRepository::new((*state.db).clone()).delete(id).await?;
    info!(branch_id = %id, "Branch deleted");
    Ok(StatusCode::NO_CONTENT)
}

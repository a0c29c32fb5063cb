//! Staff assignment routes and the per-user performance chart.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use farmstead_core::{
    domain::PerformanceStatus,
    performance::{PerformanceChart, PerformanceEntry, build_chart},
};
use farmstead_db::{PerformanceRepository, PerformanceWithDetails, entities::performance};
use farmstead_shared::types::{ActivityId, PerformanceId, UserId};
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
};

/// Creates the performance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/performance", get(list_records).post(assign))
        .route("/performance/chart", get(chart))
        .route("/performance/{id}", patch(update_status))
}

/// Optional user filter.
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    /// User to report on.
    pub user_id: Option<UserId>,
}

/// Request body for assigning staff to an activity.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    /// Staff member.
    pub user_id: UserId,
    /// Activity.
    pub activity_id: ActivityId,
    /// Initial status, `assigned` when omitted.
    pub status: Option<PerformanceStatus>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status.
    pub status: PerformanceStatus,
}

/// Staff callers are pinned to themselves; admins may pick anyone or nobody.
fn scope_user(auth: &AuthUser, requested: Option<UserId>) -> ApiResult<Option<UserId>> {
    if auth.role().can_view_all_staff() {
        return Ok(requested);
    }
    match requested {
        Some(user_id) if user_id != auth.user_id() => Err(ApiError::forbidden(
            "Cannot access another user's records",
        )),
        _ => Ok(Some(auth.user_id())),
    }
}

async fn list_records(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<Json<Vec<PerformanceWithDetails>>> {
    let user_id = scope_user(&auth, query.user_id)?;
    let records = PerformanceRepository::new((*state.db).clone())
        .list(user_id)
        .await?;
    Ok(Json(records))
}

async fn assign(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<AssignRequest>,
) -> ApiResult<(StatusCode, Json<performance::Model>)> {
    auth.require_admin()?;
    let record = PerformanceRepository::new((*state.db).clone())
        .assign(
            payload.user_id,
            payload.activity_id,
            payload.status.unwrap_or_default(),
        )
        .await?;

    info!(
        record_id = %record.id,
        user_id = %record.user_id,
        activity_id = %record.activity_id,
        "Staff assigned"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<PerformanceId>,
    ApiJson(payload): ApiJson<UpdateStatusRequest>,
) -> ApiResult<Json<performance::Model>> {
    let repo = PerformanceRepository::new((*state.db).clone());
    let record = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("performance record not found"))?;
    auth.require_self_or_admin(UserId::from_uuid(record.user_id))?;

    let record = repo.update_status(id, payload.status).await?;
    Ok(Json(record))
}

async fn chart(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<Json<PerformanceChart>> {
    let user_id = scope_user(&auth, query.user_id)?.unwrap_or_else(|| auth.user_id());
    let records = PerformanceRepository::new((*state.db).clone())
        .list(Some(user_id))
        .await?;

    let entries = records
        .into_iter()
        .map(|r| PerformanceEntry {
            activity: r.activity,
            activity_type: r.activity_type.into(),
            status: r.status.into(),
        })
        .collect();

    Ok(Json(build_chart(user_id, entries)))
}

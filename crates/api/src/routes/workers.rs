//! Worker and labor routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, put},
};
use farmstead_core::{
    dashboard::labor_cost,
    validation::{positive, positive_amount, require_text},
};
use farmstead_db::{LaborLine, WorkerRepository, entities::{activity_workers, workers}};
use farmstead_shared::types::{ActivityId, WorkerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiResult,
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Creates the worker and labor routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workers", get(list_workers).post(create_worker))
        .route("/workers/{id}", put(update_worker).delete(delete_worker))
        .route("/activities/{id}/labor", get(list_labor).post(add_labor))
        .route(
            "/activities/{id}/labor/{worker_id}",
            delete(remove_labor),
        )
}

/// Request body for creating or updating a worker.
#[derive(Debug, Deserialize)]
pub struct WorkerRequest {
    /// Worker name.
    pub name: String,
    /// Pay per hour.
    pub hourly_rate: Decimal,
}

/// Request body for logging hours.
#[derive(Debug, Deserialize)]
pub struct LaborRequest {
    /// Worker.
    pub worker_id: WorkerId,
    /// Hours worked, at least one.
    pub work_hours: i32,
}

/// Labor line with its cost.
#[derive(Debug, Serialize)]
pub struct LaborResponse {
    /// Worker ID.
    pub worker_id: Uuid,
    /// Worker name.
    pub worker_name: String,
    /// Hours worked.
    pub work_hours: i32,
    /// Hourly rate.
    pub hourly_rate: Decimal,
    /// `hourly_rate * work_hours`.
    pub cost: Decimal,
}

impl From<LaborLine> for LaborResponse {
    fn from(line: LaborLine) -> Self {
        Self {
            cost: labor_cost(line.hourly_rate, line.work_hours),
            worker_id: line.worker_id,
            worker_name: line.worker_name,
            work_hours: line.work_hours,
            hourly_rate: line.hourly_rate,
        }
    }
}

fn validate_worker(payload: &WorkerRequest) -> ApiResult<(String, Decimal)> {
    Ok((
        require_text("name", &payload.name)?,
        positive_amount("hourly_rate", payload.hourly_rate)?,
    ))
}

async fn list_workers(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<workers::Model>>> {
    Ok(Json(WorkerRepository::new((*state.db).clone()).list().await?))
}

async fn create_worker(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<WorkerRequest>,
) -> ApiResult<(StatusCode, Json<workers::Model>)> {
    auth.require_admin()?;
    let (name, rate) = validate_worker(&payload)?;
    let worker = WorkerRepository::new((*state.db).clone())
        .create(&name, rate)
        .await?;
    Ok((StatusCode::CREATED, Json(worker)))
}

async fn update_worker(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<WorkerId>,
    ApiJson(payload): ApiJson<WorkerRequest>,
) -> ApiResult<Json<workers::Model>> {
    auth.require_admin()?;
    let (name, rate) = validate_worker(&payload)?;
    let worker = WorkerRepository::new((*state.db).clone())
        .update(id, &name, rate)
        .await?;
    Ok(Json(worker))
}

async fn delete_worker(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<WorkerId>,
) -> ApiResult<StatusCode> {
    auth.require_admin()?;
    WorkerRepository::new((*state.db).clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_labor(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(activity_id): ApiPath<ActivityId>,
) -> ApiResult<Json<Vec<LaborResponse>>> {
    let lines = WorkerRepository::new((*state.db).clone())
        .labor_for_activity(activity_id)
        .await?;
    Ok(Json(lines.into_iter().map(Into::into).collect()))
}

async fn add_labor(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(activity_id): ApiPath<ActivityId>,
    ApiJson(payload): ApiJson<LaborRequest>,
) -> ApiResult<(StatusCode, Json<activity_workers::Model>)> {
    let hours = positive("work_hours", payload.work_hours)?;
    let line = WorkerRepository::new((*state.db).clone())
        .add_labor(activity_id, payload.worker_id, hours)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

async fn remove_labor(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath((activity_id, worker_id)): ApiPath<(ActivityId, WorkerId)>,
) -> ApiResult<StatusCode> {
    WorkerRepository::new((*state.db).clone())
        .remove_labor(activity_id, worker_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_labor_response_cost() {
        let response = LaborResponse::from(LaborLine {
            worker_id: Uuid::nil(),
            worker_name: "Ama".to_string(),
            work_hours: 6,
            hourly_rate: dec!(12.50),
        });
        assert_eq!(response.cost, dec!(75.00));
    }

    #[test]
    fn test_worker_rate_must_be_positive() {
        let payload = WorkerRequest {
            name: "Kofi".to_string(),
            hourly_rate: Decimal::ZERO,
        };
        assert!(validate_worker(&payload).is_err());
    }
}

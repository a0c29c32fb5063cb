//! Dashboard route.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use farmstead_core::dashboard::{Dashboard, DashboardService};
use farmstead_db::DashboardRepository;
use tracing::debug;

use crate::{AppState, error::ApiResult, middleware::AuthUser};

/// Creates the dashboard route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// GET /dashboard - Summary cards, per-type totals, activity table, and
/// notifications.
async fn get_dashboard(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Dashboard>> {
    let input = DashboardRepository::new((*state.db).clone())
        .load_input()
        .await?;
    debug!(
        activities = input.activities.len(),
        allocations = input.allocations.len(),
        assignments = input.assignments.len(),
        "Building dashboard"
    );

    Ok(Json(DashboardService::build(&input, Utc::now().date_naive())))
}

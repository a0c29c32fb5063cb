//! Report routes: the searchable activity report, its CSV export, and the
//! branch and monthly summaries.
//!
//! Query parameters are validated before any database work so a bad sort key
//! or year fails fast with 400.

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Datelike, Utc};
use farmstead_core::{
    dashboard::{ActivityReportRow, DashboardService},
    reports::{
        BranchReportRow, MonthlyReport, ReportQuery, ReportService,
        csv::{export_filename, render_activity_csv},
    },
};
use farmstead_db::DashboardRepository;
use farmstead_shared::types::PageResponse;
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState, error::ApiResult, extractors::ApiQuery, middleware::AuthUser,
    routes::activities::page_request,
};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/activities", get(activity_report))
        .route("/reports/activities/export", get(export_activity_report))
        .route("/reports/branches", get(branch_report))
        .route("/reports/monthly", get(monthly_report))
}

/// Search, sort, and paging parameters for the activity report.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityReportQuery {
    /// Case-insensitive substring.
    pub search: Option<String>,
    /// Sort column.
    pub sort: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl ActivityReportQuery {
    fn report_query(&self) -> ApiResult<ReportQuery> {
        Ok(ReportQuery::parse(
            self.search.as_deref(),
            self.sort.as_deref(),
            self.order.as_deref(),
        )?)
    }
}

/// Year selector for the monthly report.
#[derive(Debug, Default, Deserialize)]
pub struct MonthlyQuery {
    /// Calendar year, the current one when omitted.
    pub year: Option<i32>,
}

async fn report_rows(state: &AppState, query: &ReportQuery) -> ApiResult<Vec<ActivityReportRow>> {
    let input = DashboardRepository::new((*state.db).clone())
        .load_input()
        .await?;
    let rows = DashboardService::activity_rows(&input, Utc::now().date_naive());
    Ok(query.apply(rows))
}

/// GET /reports/activities
async fn activity_report(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(params): ApiQuery<ActivityReportQuery>,
) -> ApiResult<Json<PageResponse<ActivityReportRow>>> {
    let query = params.report_query()?;
    let page = page_request(params.page, params.per_page);

    let rows = report_rows(&state, &query).await?;
    Ok(Json(page.paginate(rows)))
}

/// GET /reports/activities/export
async fn export_activity_report(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ActivityReportQuery>,
) -> ApiResult<Response> {
    let query = params.report_query()?;
    let rows = report_rows(&state, &query).await?;
    let filename = export_filename(Utc::now().date_naive());

    info!(user_id = %auth.user_id(), rows = rows.len(), file = %filename, "Activity report exported");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        render_activity_csv(&rows),
    )
        .into_response())
}

/// GET /reports/branches
async fn branch_report(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<BranchReportRow>>> {
    let repo = DashboardRepository::new((*state.db).clone());
    let branches = repo.branches().await?;
    let assignments = repo.assignments().await?;
    let activities = repo.activities(None, None).await?;

    Ok(Json(ReportService::branch_report(
        &branches,
        &assignments,
        &activities,
    )))
}

/// GET /reports/monthly
async fn monthly_report(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(params): ApiQuery<MonthlyQuery>,
) -> ApiResult<Json<MonthlyReport>> {
    let year = params.year.unwrap_or_else(|| Utc::now().year());
    let (from, to) = ReportService::year_bounds(year)?;

    let activities = DashboardRepository::new((*state.db).clone())
        .activities(Some(from), Some(to))
        .await?;
    Ok(Json(ReportService::monthly(&activities, year)?))
}

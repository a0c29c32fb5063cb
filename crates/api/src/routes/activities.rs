//! Activity routes.
//!
//! Creating an activity dated after today also schedules it; the schedule row
//! is written in the same transaction.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::{NaiveDate, Utc};
use farmstead_core::{
    domain::ActivityType,
    scheduling::plan_for_activity,
    validation::{require_text, validate_activity_amount, validate_date_range},
};
use farmstead_db::{
    ActivityFilter, ActivityInput, ActivityRepository,
    entities::{activities, schedules},
};
use farmstead_shared::types::{ActivityId, PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
};

/// Creates the activity routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/activities", get(list_activities).post(create_activity))
        .route(
            "/activities/{id}",
            get(get_activity)
                .put(update_activity)
                .delete(delete_activity),
        )
}

/// Request body for creating or replacing an activity.
#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    /// What was done.
    pub description: String,
    /// Revenue, expense, or neutral.
    pub activity_type: ActivityType,
    /// Money amount.
    pub amount: Decimal,
    /// When it happened or is planned.
    pub activity_date: NaiveDate,
    /// Custom reminder text for future-dated activities.
    pub notification_message: Option<String>,
}

impl ActivityRequest {
    fn validate(self) -> ApiResult<(ActivityInput, Option<String>)> {
        let description = require_text("description", &self.description)?;
        validate_activity_amount(self.activity_type, self.amount)?;
        Ok((
            ActivityInput {
                description,
                activity_type: self.activity_type,
                amount: self.amount,
                activity_date: self.activity_date,
            },
            self.notification_message,
        ))
    }
}

/// Query parameters for listing activities.
#[derive(Debug, Deserialize)]
pub struct ListActivitiesQuery {
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Type filter.
    pub activity_type: Option<String>,
    /// Earliest activity date.
    pub from: Option<NaiveDate>,
    /// Latest activity date.
    pub to: Option<NaiveDate>,
}

/// Response for a created activity.
#[derive(Debug, Serialize)]
pub struct CreateActivityResponse {
    /// The stored activity.
    pub activity: activities::Model,
    /// Whether a schedule entry was created.
    pub scheduled: bool,
    /// The schedule entry, if any.
    pub schedule: Option<schedules::Model>,
}

/// Builds a normalized page request from optional query values.
pub(crate) fn page_request(page: Option<u32>, per_page: Option<u32>) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest {
        page: page.unwrap_or(defaults.page),
        per_page: per_page.unwrap_or(defaults.per_page),
    }
    .normalized()
}

/// POST /activities
async fn create_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<ActivityRequest>,
) -> ApiResult<(StatusCode, Json<CreateActivityResponse>)> {
    let (input, message) = payload.validate()?;
    let plan = plan_for_activity(
        &input.description,
        input.activity_date,
        message.as_deref(),
        Utc::now().date_naive(),
    );

    let (activity, schedule) = ActivityRepository::new((*state.db).clone())
        .create(input, plan)
        .await?;

    info!(
        activity_id = %activity.id,
        user_id = %auth.user_id(),
        scheduled = schedule.is_some(),
        "Activity created"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreateActivityResponse {
            activity,
            scheduled: schedule.is_some(),
            schedule,
        }),
    ))
}

/// GET /activities
async fn list_activities(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(query): ApiQuery<ListActivitiesQuery>,
) -> ApiResult<Json<PageResponse<activities::Model>>> {
    validate_date_range(query.from, query.to)?;
    let filter = ActivityFilter {
        activity_type: query
            .activity_type
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(str::parse::<ActivityType>)
            .transpose()?,
        from: query.from,
        to: query.to,
    };
    let page = page_request(query.page, query.per_page);

    let (items, total) = ActivityRepository::new((*state.db).clone())
        .list(&filter, &page)
        .await?;

    Ok(Json(PageResponse::new(items, page.page, page.per_page, total)))
}

/// GET /activities/{id}
async fn get_activity(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<ActivityId>,
) -> ApiResult<Json<activities::Model>> {
    let activity = ActivityRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("activity not found"))?;
    Ok(Json(activity))
}

/// PUT /activities/{id}
async fn update_activity(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<ActivityId>,
    ApiJson(payload): ApiJson<ActivityRequest>,
) -> ApiResult<Json<activities::Model>> {
    let (input, _) = payload.validate()?;
    let activity = ActivityRepository::new((*state.db).clone())
        .update(id, input)
        .await?;
    Ok(Json(activity))
}

/// DELETE /activities/{id}
async fn delete_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<ActivityId>,
) -> ApiResult<StatusCode> {
    ActivityRepository::new((*state.db).clone())
        .delete(id)
        .await?;
    info!(activity_id = %id, user_id = %auth.user_id(), "Activity deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 20)]
    #[case(Some(0), Some(0), 1, 1)]
    #[case(Some(3), Some(500), 3, 100)]
    fn test_page_request(
        #[case] page: Option<u32>,
        #[case] per_page: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_per_page: u32,
    ) {
        let request = page_request(page, per_page);
        assert_eq!(request.page, expected_page);
        assert_eq!(request.per_page, expected_per_page);
    }

    #[test]
    fn test_validate_rejects_blank_description() {
        let request = ActivityRequest {
            description: "   ".to_string(),
            activity_type: ActivityType::Revenue,
            amount: Decimal::ONE,
            activity_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            notification_message: None,
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.inner().status_code(), 400);
    }

    #[test]
    fn test_validate_rejects_zero_revenue() {
        let request = ActivityRequest {
            description: "Sold eggs".to_string(),
            activity_type: ActivityType::Revenue,
            amount: Decimal::ZERO,
            activity_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            notification_message: None,
        };
        assert!(request.validate().is_err());
    }
}

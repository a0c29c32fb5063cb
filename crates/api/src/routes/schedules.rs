//! Schedule routes and the calendar feed.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::{NaiveDate, Utc};
use farmstead_core::{
    scheduling::calendar_start,
    validation::{optional_text, validate_date_range, validate_schedule_date},
};
use farmstead_db::{ScheduleRepository, ScheduleWithActivity, entities::schedules};
use farmstead_shared::types::{ActivityId, ScheduleId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiResult,
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
};

/// Title shown for a schedule whose activity no longer exists.
const UNTITLED: &str = "Untitled Activity";

/// Creates the schedule routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedules", get(list_events).post(create_schedule))
        .route("/schedules/{id}", delete(delete_schedule))
        .route("/schedules/{id}/acknowledge", post(acknowledge))
}

/// Query parameters for the calendar feed.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    /// First date to include.
    pub from: Option<NaiveDate>,
    /// Last date to include.
    pub to: Option<NaiveDate>,
}

/// Request body for scheduling an activity.
#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    /// Activity to schedule.
    pub activity_id: ActivityId,
    /// Due date, today or later.
    pub scheduled_date: NaiveDate,
    /// Reminder text.
    pub notification_message: Option<String>,
}

/// One calendar event.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Schedule ID.
    pub id: Uuid,
    /// Activity description.
    pub title: String,
    /// ISO-8601 start.
    pub start: String,
}

impl From<ScheduleWithActivity> for CalendarEvent {
    fn from(row: ScheduleWithActivity) -> Self {
        Self {
            id: row.id,
            title: row
                .activity_description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            start: calendar_start(row.scheduled_date),
        }
    }
}

/// Calendar feed response.
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    /// Events in date order.
    pub events: Vec<CalendarEvent>,
    /// Number of events.
    pub total: usize,
}

async fn list_events(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(query): ApiQuery<EventsQuery>,
) -> ApiResult<Json<EventsResponse>> {
    validate_date_range(query.from, query.to)?;
    let rows = ScheduleRepository::new((*state.db).clone())
        .list(query.from, query.to)
        .await?;

    let events: Vec<CalendarEvent> = rows.into_iter().map(Into::into).collect();
    Ok(Json(EventsResponse {
        total: events.len(),
        events,
    }))
}

async fn create_schedule(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiJson(payload): ApiJson<CreateScheduleRequest>,
) -> ApiResult<(StatusCode, Json<schedules::Model>)> {
    validate_schedule_date(payload.scheduled_date, Utc::now().date_naive())?;
    let message = optional_text(
        "notification_message",
        payload.notification_message.as_deref(),
    )?;

    let schedule = ScheduleRepository::new((*state.db).clone())
        .create(payload.activity_id, payload.scheduled_date, message)
        .await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

async fn acknowledge(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<ScheduleId>,
) -> ApiResult<Json<schedules::Model>> {
    let schedule = ScheduleRepository::new((*state.db).clone())
        .acknowledge(id)
        .await?;
    Ok(Json(schedule))
}

async fn delete_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<ScheduleId>,
) -> ApiResult<StatusCode> {
    auth.require_admin()?;
    ScheduleRepository::new((*state.db).clone())
        .delete(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(description: Option<&str>) -> ScheduleWithActivity {
        ScheduleWithActivity {
            id: Uuid::nil(),
            activity_id: Uuid::nil(),
            scheduled_date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            notification_message: None,
            notification_sent: false,
            activity_description: description.map(ToString::to_string),
        }
    }

    #[test]
    fn test_event_from_row() {
        let event = CalendarEvent::from(row(Some("Harvest maize")));
        assert_eq!(event.title, "Harvest maize");
        assert_eq!(event.start, "2025-03-09T00:00:00Z");
    }

    #[test]
    fn test_missing_activity_is_untitled() {
        assert_eq!(CalendarEvent::from(row(None)).title, UNTITLED);
        assert_eq!(CalendarEvent::from(row(Some(" "))).title, UNTITLED);
    }
}

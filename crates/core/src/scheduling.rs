//! Turning future-dated activities into schedule entries.

use chrono::NaiveDate;

/// Schedule entry to create alongside an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSchedule {
    /// Date the activity is due.
    pub scheduled_date: NaiveDate,
    /// Message shown in the dashboard notifications.
    pub notification_message: String,
}

/// Message used when the client does not supply one.
#[must_use]
pub fn default_notification(description: &str, date: NaiveDate) -> String {
    format!("Upcoming activity: {description} on {}", date.format("%Y-%m-%d"))
}

/// Returns the schedule to create for an activity dated after `today`.
///
/// Activities dated today or earlier are plain log entries and get no
/// schedule. A blank custom message falls back to [`default_notification`].
#[must_use]
pub fn plan_for_activity(
    description: &str,
    activity_date: NaiveDate,
    message: Option<&str>,
    today: NaiveDate,
) -> Option<PlannedSchedule> {
    if activity_date <= today {
        return None;
    }

    let notification_message = message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map_or_else(
            || default_notification(description, activity_date),
            ToString::to_string,
        );

    Some(PlannedSchedule {
        scheduled_date: activity_date,
        notification_message,
    })
}

/// Calendar event start time for a schedule date (midnight UTC, ISO-8601).
#[must_use]
pub fn calendar_start(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_past_and_today_not_scheduled() {
        let today = date(2024, 10, 18);
        assert!(plan_for_activity("Milking", today, None, today).is_none());
        assert!(plan_for_activity("Milking", date(2024, 10, 1), None, today).is_none());
    }

    #[test]
    fn test_future_gets_default_message() {
        let today = date(2024, 10, 18);
        let plan = plan_for_activity("Harvest maize", date(2024, 11, 2), None, today).unwrap();
        assert_eq!(plan.scheduled_date, date(2024, 11, 2));
        assert_eq!(
            plan.notification_message,
            "Upcoming activity: Harvest maize on 2024-11-02"
        );
    }

    #[test]
    fn test_custom_message_kept_blank_ignored() {
        let today = date(2024, 10, 18);
        let plan =
            plan_for_activity("Spray", date(2024, 10, 20), Some(" Bring masks "), today).unwrap();
        assert_eq!(plan.notification_message, "Bring masks");

        let plan = plan_for_activity("Spray", date(2024, 10, 20), Some("  "), today).unwrap();
        assert_eq!(
            plan.notification_message,
            "Upcoming activity: Spray on 2024-10-20"
        );
    }

    #[test]
    fn test_calendar_start() {
        assert_eq!(calendar_start(date(2024, 3, 5)), "2024-03-05T00:00:00Z");
    }
}

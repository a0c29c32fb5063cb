//! Staff performance chart.

use farmstead_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ActivityType, PerformanceStatus};

/// One assigned activity in the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    /// Activity description.
    pub activity: String,
    /// Activity type.
    pub activity_type: ActivityType,
    /// Progress on it.
    pub status: PerformanceStatus,
}

/// Assignments per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Not started.
    pub assigned: u64,
    /// Started.
    pub in_progress: u64,
    /// Done.
    pub completed: u64,
}

impl StatusCounts {
    /// Total assignments.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.assigned + self.in_progress + self.completed
    }
}

/// Chart payload for one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceChart {
    /// The staff member.
    pub user_id: UserId,
    /// Assignments per status.
    pub status_counts: StatusCounts,
    /// Percentage of assignments completed, 0 to 100, two decimal places.
    pub completion_rate: Decimal,
    /// Assigned activities.
    pub activities: Vec<PerformanceEntry>,
}

/// Builds the chart from a user's performance entries.
#[must_use]
pub fn build_chart(user_id: UserId, activities: Vec<PerformanceEntry>) -> PerformanceChart {
    let mut status_counts = StatusCounts::default();
    for entry in &activities {
        match entry.status {
            PerformanceStatus::Assigned => status_counts.assigned += 1,
            PerformanceStatus::InProgress => status_counts.in_progress += 1,
            PerformanceStatus::Completed => status_counts.completed += 1,
        }
    }

    PerformanceChart {
        user_id,
        status_counts,
        completion_rate: completion_rate(&status_counts),
        activities,
    }
}

/// Completed share as a percentage; zero when nothing is assigned.
#[must_use]
pub fn completion_rate(counts: &StatusCounts) -> Decimal {
    let total = counts.total();
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(counts.completed) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(status: PerformanceStatus) -> PerformanceEntry {
        PerformanceEntry {
            activity: "Harvest".to_string(),
            activity_type: ActivityType::Revenue,
            status,
        }
    }

    #[test]
    fn test_empty_chart() {
        let chart = build_chart(UserId::new(), vec![]);
        assert_eq!(chart.status_counts, StatusCounts::default());
        assert_eq!(chart.completion_rate, Decimal::ZERO);
    }

    #[test]
    fn test_counts_and_rate() {
        let chart = build_chart(
            UserId::new(),
            vec![
                entry(PerformanceStatus::Completed),
                entry(PerformanceStatus::InProgress),
                entry(PerformanceStatus::Assigned),
            ],
        );
        assert_eq!(chart.status_counts.assigned, 1);
        assert_eq!(chart.status_counts.in_progress, 1);
        assert_eq!(chart.status_counts.completed, 1);
        assert_eq!(chart.completion_rate, dec!(33.33));
        assert_eq!(chart.activities.len(), 3);
    }

    #[test]
    fn test_all_completed() {
        let counts = StatusCounts {
            assigned: 0,
            in_progress: 0,
            completed: 4,
        };
        assert_eq!(completion_rate(&counts), dec!(100));
    }
}

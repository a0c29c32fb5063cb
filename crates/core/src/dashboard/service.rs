//! Dashboard aggregation service.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use farmstead_shared::types::ActivityId;
use rust_decimal::Decimal;

use super::types::{
    ActivityRecord, ActivityReportRow, ActivityTypeSummary, Dashboard, DashboardInput,
    DashboardSummary, LaborRecord, ScheduleRecord, StockRecord,
};
use crate::domain::{ActivityType, PerformanceStatus};

/// Cost of one labor line.
#[must_use]
pub fn labor_cost(hourly_rate: Decimal, work_hours: i32) -> Decimal {
    hourly_rate * Decimal::from(work_hours)
}

/// Renders an allocation as `"<name> (<quantity> <unit>)"`.
#[must_use]
pub fn format_allocation(name: &str, quantity: i32, unit: Option<&str>) -> String {
    match unit.map(str::trim).filter(|u| !u.is_empty()) {
        Some(unit) => format!("{name} ({quantity} {unit})"),
        None => format!("{name} ({quantity})"),
    }
}

/// Renders an assignment as `"<username> [<status label>]"`.
#[must_use]
pub fn format_assignment(username: &str, status: PerformanceStatus) -> String {
    format!("{username} [{}]", status.label())
}

/// A resource is low on stock once it drops to its non-zero threshold.
#[must_use]
pub const fn is_low_stock(quantity: i32, threshold: i32) -> bool {
    threshold > 0 && quantity <= threshold
}

#[derive(Default)]
struct RowRelations {
    resources: BTreeSet<String>,
    staff: BTreeSet<String>,
    dates: BTreeSet<NaiveDate>,
    branches: BTreeSet<String>,
    labor_cost: Decimal,
}

/// Service for building the dashboard.
pub struct DashboardService;

impl DashboardService {
    /// Builds the full dashboard.
    #[must_use]
    pub fn build(input: &DashboardInput, today: NaiveDate) -> Dashboard {
        Dashboard {
            summary: Self::summarize(&input.activities, &input.labor),
            activities_by_type: Self::group_by_type(&input.activities),
            activities_list: Self::activity_rows(input, today),
            notifications: Self::notifications(&input.schedules, &input.stock),
        }
    }

    /// Headline totals over all activities.
    #[must_use]
    pub fn summarize(activities: &[ActivityRecord], labor: &[LaborRecord]) -> DashboardSummary {
        let mut total_revenue = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;

        for activity in activities {
            match activity.activity_type {
                ActivityType::Revenue => total_revenue += activity.amount,
                ActivityType::Expense => total_expenses += activity.amount,
                ActivityType::Neutral => {}
            }
        }

        DashboardSummary {
            total_revenue,
            total_expenses,
            net_profit: total_revenue - total_expenses,
            activity_count: activities.len() as u64,
            labor_cost: labor
                .iter()
                .map(|l| labor_cost(l.hourly_rate, l.work_hours))
                .sum(),
        }
    }

    /// Groups revenue and expense activities by type.
    ///
    /// Groups appear in [`ActivityType::ALL`] order and only when at least one
    /// activity of that type exists. Descriptions keep the input order.
    #[must_use]
    pub fn group_by_type(activities: &[ActivityRecord]) -> Vec<ActivityTypeSummary> {
        ActivityType::ALL
            .iter()
            .filter(|t| t.is_monetary())
            .filter_map(|&activity_type| {
                let members: Vec<&ActivityRecord> = activities
                    .iter()
                    .filter(|a| a.activity_type == activity_type)
                    .collect();
                if members.is_empty() {
                    return None;
                }

                let total_amount: Decimal = members.iter().map(|a| a.amount).sum();
                let (revenue_amount, expense_amount) = match activity_type {
                    ActivityType::Revenue => (total_amount, Decimal::ZERO),
                    ActivityType::Expense => (Decimal::ZERO, total_amount),
                    ActivityType::Neutral => (Decimal::ZERO, Decimal::ZERO),
                };

                Some(ActivityTypeSummary {
                    activity_type,
                    total_amount,
                    revenue_amount,
                    expense_amount,
                    net_profit: revenue_amount - expense_amount,
                    activities: members.iter().map(|a| a.description.clone()).collect(),
                })
            })
            .collect()
    }

    /// One row per activity with its relations flattened.
    ///
    /// Relation rows pointing at activities not in `input.activities` are
    /// ignored. Schedule dates before `today` are dropped.
    #[must_use]
    pub fn activity_rows(input: &DashboardInput, today: NaiveDate) -> Vec<ActivityReportRow> {
        let mut relations: HashMap<ActivityId, RowRelations> = input
            .activities
            .iter()
            .map(|a| (a.id, RowRelations::default()))
            .collect();

        for allocation in &input.allocations {
            if let Some(rel) = relations.get_mut(&allocation.activity_id) {
                rel.resources.insert(format_allocation(
                    &allocation.resource_name,
                    allocation.allocated_quantity,
                    allocation.unit.as_deref(),
                ));
            }
        }

        for assignment in &input.assignments {
            if let Some(rel) = relations.get_mut(&assignment.activity_id) {
                rel.staff
                    .insert(format_assignment(&assignment.username, assignment.status));
                if let Some(location) = assignment
                    .branch_location
                    .as_deref()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                {
                    rel.branches.insert(location.to_string());
                }
            }
        }

        for schedule in &input.schedules {
            if schedule.scheduled_date < today {
                continue;
            }
            if let Some(rel) = relations.get_mut(&schedule.activity_id) {
                rel.dates.insert(schedule.scheduled_date);
            }
        }

        for line in &input.labor {
            if let Some(rel) = relations.get_mut(&line.activity_id) {
                rel.labor_cost += labor_cost(line.hourly_rate, line.work_hours);
            }
        }

        input
            .activities
            .iter()
            .filter_map(|activity| {
                // Duplicate activity rows collapse onto the first occurrence.
                let rel = relations.remove(&activity.id)?;
                Some(ActivityReportRow {
                    activity_id: activity.id,
                    activity_type: activity.activity_type,
                    description: activity.description.clone(),
                    amount: activity.amount,
                    activity_date: activity.activity_date,
                    created_at: activity.created_at,
                    resources_used: rel.resources.into_iter().collect(),
                    assigned_staff: rel.staff.into_iter().collect(),
                    upcoming_dates: rel.dates.into_iter().collect(),
                    involved_branches: rel.branches.into_iter().collect(),
                    labor_cost: rel.labor_cost,
                })
            })
            .collect()
    }

    /// Schedule messages, oldest first, then restock alerts in input order.
    #[must_use]
    pub fn notifications(schedules: &[ScheduleRecord], stock: &[StockRecord]) -> Vec<String> {
        let mut dated: Vec<(NaiveDate, &str)> = schedules
            .iter()
            .filter_map(|s| {
                s.notification_message
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(|m| (s.scheduled_date, m))
            })
            .collect();
        // Stable sort keeps insertion order for same-day messages.
        dated.sort_by_key(|(date, _)| *date);

        let mut notifications: Vec<String> = dated.into_iter().map(|(_, m)| m.to_string()).collect();
        notifications.extend(
            stock
                .iter()
                .filter(|r| is_low_stock(r.quantity, r.threshold))
                .map(Self::restock_message),
        );
        notifications
    }

    fn restock_message(resource: &StockRecord) -> String {
        let quantity = match resource.unit.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(unit) => format!("{} {unit}", resource.quantity),
            None => resource.quantity.to_string(),
        };
        format!(
            "Low stock: {} ({quantity} remaining, threshold {})",
            resource.name, resource.threshold
        )
    }
}

//! Report generation service.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use farmstead_shared::types::{ActivityId, BranchId};
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{BranchRecord, BranchReportRow, MonthlyBucket, MonthlyReport};
use crate::dashboard::{ActivityRecord, AssignmentRecord};
use crate::domain::{ActivityType, PerformanceStatus};

/// Service for generating derived reports.
pub struct ReportService;

impl ReportService {
    /// Builds the per-branch report.
    ///
    /// An activity counts once per branch no matter how many of the branch's
    /// staff are assigned to it. Completed assignments count per assignment.
    #[must_use]
    pub fn branch_report(
        branches: &[BranchRecord],
        assignments: &[AssignmentRecord],
        activities: &[ActivityRecord],
    ) -> Vec<BranchReportRow> {
        let by_id: HashMap<ActivityId, &ActivityRecord> =
            activities.iter().map(|a| (a.id, a)).collect();

        let mut assigned: HashMap<BranchId, HashSet<ActivityId>> = HashMap::new();
        let mut completed: HashMap<BranchId, u64> = HashMap::new();
        for assignment in assignments {
            let Some(branch_id) = assignment.branch_id else {
                continue;
            };
            assigned
                .entry(branch_id)
                .or_default()
                .insert(assignment.activity_id);
            if assignment.status == PerformanceStatus::Completed {
                *completed.entry(branch_id).or_default() += 1;
            }
        }

        branches
            .iter()
            .map(|branch| {
                let activity_ids = assigned.remove(&branch.id).unwrap_or_default();
                let mut revenue_amount = Decimal::ZERO;
                let mut expense_amount = Decimal::ZERO;
                for activity in activity_ids.iter().filter_map(|id| by_id.get(id)) {
                    match activity.activity_type {
                        ActivityType::Revenue => revenue_amount += activity.amount,
                        ActivityType::Expense => expense_amount += activity.amount,
                        ActivityType::Neutral => {}
                    }
                }

                BranchReportRow {
                    branch_id: branch.id,
                    name: branch.name.clone(),
                    location: branch.location.clone(),
                    staff_count: branch.staff_count,
                    assigned_activities: activity_ids.len() as u64,
                    completed_assignments: completed.get(&branch.id).copied().unwrap_or(0),
                    revenue_amount,
                    expense_amount,
                    net_profit: revenue_amount - expense_amount,
                }
            })
            .collect()
    }

    /// First and last day of a reportable year.
    pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), ReportError> {
        if !(1900..=9999).contains(&year) {
            return Err(ReportError::InvalidYear(year));
        }
        NaiveDate::from_ymd_opt(year, 1, 1)
            .zip(NaiveDate::from_ymd_opt(year, 12, 31))
            .ok_or(ReportError::InvalidYear(year))
    }

    /// Buckets a year's activities by month.
    pub fn monthly(activities: &[ActivityRecord], year: i32) -> Result<MonthlyReport, ReportError> {
        Self::year_bounds(year)?;

        let mut months: Vec<MonthlyBucket> = (1..=12)
            .map(|month| MonthlyBucket {
                month,
                revenue: Decimal::ZERO,
                expense: Decimal::ZERO,
                net: Decimal::ZERO,
                activity_count: 0,
            })
            .collect();

        for activity in activities.iter().filter(|a| a.activity_date.year() == year) {
            let bucket = &mut months[activity.activity_date.month0() as usize];
            bucket.activity_count += 1;
            match activity.activity_type {
                ActivityType::Revenue => bucket.revenue += activity.amount,
                ActivityType::Expense => bucket.expense += activity.amount,
                ActivityType::Neutral => {}
            }
        }

        for bucket in &mut months {
            bucket.net = bucket.revenue - bucket.expense;
        }

        let total_revenue: Decimal = months.iter().map(|m| m.revenue).sum();
        let total_expense: Decimal = months.iter().map(|m| m.expense).sum();

        Ok(MonthlyReport {
            year,
            months,
            total_revenue,
            total_expense,
            net_profit: total_revenue - total_expense,
        })
    }
}

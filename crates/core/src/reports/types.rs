//! Report types.

use farmstead_shared::types::BranchId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A branch with its staff headcount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRecord {
    /// Branch ID.
    pub id: BranchId,
    /// Branch name.
    pub name: String,
    /// Branch location.
    pub location: String,
    /// Users assigned to the branch.
    pub staff_count: u64,
}

/// Per-branch activity report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchReportRow {
    /// Branch ID.
    pub branch_id: BranchId,
    /// Branch name.
    pub name: String,
    /// Branch location.
    pub location: String,
    /// Users assigned to the branch.
    pub staff_count: u64,
    /// Distinct activities the branch's staff are assigned to.
    pub assigned_activities: u64,
    /// Assignments marked completed.
    pub completed_assignments: u64,
    /// Revenue over the distinct assigned activities.
    pub revenue_amount: Decimal,
    /// Expenses over the distinct assigned activities.
    pub expense_amount: Decimal,
    /// `revenue_amount - expense_amount`.
    pub net_profit: Decimal,
}

/// Revenue and expense for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// Month number, 1 to 12.
    pub month: u32,
    /// Revenue dated in the month.
    pub revenue: Decimal,
    /// Expenses dated in the month.
    pub expense: Decimal,
    /// `revenue - expense`.
    pub net: Decimal,
    /// Activities of any type dated in the month.
    pub activity_count: u64,
}

/// Twelve monthly buckets for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// Calendar year.
    pub year: i32,
    /// January through December.
    pub months: Vec<MonthlyBucket>,
    /// Revenue for the year.
    pub total_revenue: Decimal,
    /// Expenses for the year.
    pub total_expense: Decimal,
    /// Net for the year.
    pub net_profit: Decimal,
}

//! Dashboard data types.

use chrono::{DateTime, NaiveDate, Utc};
use farmstead_shared::types::{ActivityId, BranchId, ResourceId, ScheduleId, UserId, WorkerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ActivityType, PerformanceStatus};

// ============================================================================
// Input rows
// ============================================================================

/// One logged activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Activity ID.
    pub id: ActivityId,
    /// Free-text description.
    pub description: String,
    /// Revenue, expense, or neutral.
    pub activity_type: ActivityType,
    /// Non-negative amount; the type carries the sign.
    pub amount: Decimal,
    /// Day the activity happens.
    pub activity_date: NaiveDate,
    /// When it was logged.
    pub created_at: DateTime<Utc>,
}

/// A resource allocated to an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRecord {
    /// Activity the resource is allocated to.
    pub activity_id: ActivityId,
    /// Allocated resource.
    pub resource_id: ResourceId,
    /// Resource name.
    pub resource_name: String,
    /// Quantity set aside for the activity.
    pub allocated_quantity: i32,
    /// Unit of measure, absent for human resources.
    pub unit: Option<String>,
}

/// A staff member's performance record on an activity, joined with the
/// staff member's branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    /// Assigned activity.
    pub activity_id: ActivityId,
    /// Assigned user.
    pub user_id: UserId,
    /// Username.
    pub username: String,
    /// Progress.
    pub status: PerformanceStatus,
    /// User's branch.
    pub branch_id: Option<BranchId>,
    /// Location of the user's branch.
    pub branch_location: Option<String>,
}

/// A schedule entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRecord {
    /// Schedule ID.
    pub id: ScheduleId,
    /// Scheduled activity.
    pub activity_id: ActivityId,
    /// Due date.
    pub scheduled_date: NaiveDate,
    /// Notification text.
    pub notification_message: Option<String>,
}

/// Hours a worker logged on an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaborRecord {
    /// Activity worked on.
    pub activity_id: ActivityId,
    /// Worker.
    pub worker_id: WorkerId,
    /// Whole hours worked.
    pub work_hours: i32,
    /// Worker's hourly rate.
    pub hourly_rate: Decimal,
}

/// Stock level of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    /// Resource ID.
    pub resource_id: ResourceId,
    /// Resource name.
    pub name: String,
    /// Quantity on hand.
    pub quantity: i32,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Restock alert level; zero disables the alert.
    pub threshold: i32,
}

/// Everything the dashboard joins over.
#[derive(Debug, Clone, Default)]
pub struct DashboardInput {
    /// Activities in display order.
    pub activities: Vec<ActivityRecord>,
    /// Resource allocations.
    pub allocations: Vec<AllocationRecord>,
    /// Staff assignments.
    pub assignments: Vec<AssignmentRecord>,
    /// Schedule entries.
    pub schedules: Vec<ScheduleRecord>,
    /// Labor lines.
    pub labor: Vec<LaborRecord>,
    /// Resource stock levels.
    pub stock: Vec<StockRecord>,
}

// ============================================================================
// Output
// ============================================================================

/// Headline figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Sum of revenue amounts.
    pub total_revenue: Decimal,
    /// Sum of expense amounts.
    pub total_expenses: Decimal,
    /// Revenue minus expenses.
    pub net_profit: Decimal,
    /// Number of activities of any type.
    pub activity_count: u64,
    /// Total labor cost across all activities.
    pub labor_cost: Decimal,
}

/// Aggregate for one activity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTypeSummary {
    /// The type.
    pub activity_type: ActivityType,
    /// Sum of amounts.
    pub total_amount: Decimal,
    /// Portion that is revenue.
    pub revenue_amount: Decimal,
    /// Portion that is expense.
    pub expense_amount: Decimal,
    /// `revenue_amount - expense_amount`.
    pub net_profit: Decimal,
    /// Descriptions of the grouped activities.
    pub activities: Vec<String>,
}

/// One activity with its joined relations flattened into lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReportRow {
    /// Activity ID.
    pub activity_id: ActivityId,
    /// Type.
    pub activity_type: ActivityType,
    /// Description.
    pub description: String,
    /// Amount.
    pub amount: Decimal,
    /// Activity date.
    pub activity_date: NaiveDate,
    /// When it was logged.
    pub created_at: DateTime<Utc>,
    /// `"<name> (<quantity> <unit>)"` per allocated resource.
    pub resources_used: Vec<String>,
    /// `"<username> [<status>]"` per assignment.
    pub assigned_staff: Vec<String>,
    /// Scheduled dates from today on.
    pub upcoming_dates: Vec<NaiveDate>,
    /// Branch locations of the assigned staff.
    pub involved_branches: Vec<String>,
    /// Sum of hours times rate over the activity's labor lines.
    pub labor_cost: Decimal,
}

/// The full dashboard payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Headline figures.
    pub summary: DashboardSummary,
    /// Revenue and expense groups; neutral activities are left out.
    pub activities_by_type: Vec<ActivityTypeSummary>,
    /// One row per activity.
    pub activities_list: Vec<ActivityReportRow>,
    /// Schedule messages followed by restock alerts.
    pub notifications: Vec<String>,
}

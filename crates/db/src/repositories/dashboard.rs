//! Dashboard and report data loading.
//!
//! Fetches the flat rows the core aggregation works on. Each relation is one
//! query; joining and de-duplication happen in `farmstead_core::dashboard`.

use chrono::{DateTime, NaiveDate, Utc};
use farmstead_core::dashboard::{
    ActivityRecord, AllocationRecord, AssignmentRecord, DashboardInput, LaborRecord,
    ScheduleRecord, StockRecord,
};
use farmstead_core::reports::BranchRecord;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use super::branch::BranchRepository;
use super::error::RepoError;
use crate::entities::{
    activities, activity_resources, activity_workers, branches, performance, resources,
    schedules, sea_orm_active_enums::PerformanceStatus, users, workers,
};

#[derive(Debug, FromQueryResult)]
struct AllocationRow {
    activity_id: Uuid,
    resource_id: Uuid,
    resource_name: String,
    allocated_quantity: i32,
    unit: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct AssignmentRow {
    activity_id: Uuid,
    user_id: Uuid,
    username: String,
    status: PerformanceStatus,
    branch_id: Option<Uuid>,
    branch_location: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct LaborRow {
    activity_id: Uuid,
    worker_id: Uuid,
    work_hours: i32,
    hourly_rate: Decimal,
}

/// Loads dashboard and report inputs.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every relation the dashboard joins over.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn load_input(&self) -> Result<DashboardInput, RepoError> {
        Ok(DashboardInput {
            activities: self.activities(None, None).await?,
            allocations: self.allocations().await?,
            assignments: self.assignments().await?,
            schedules: self.schedules().await?,
            labor: self.labor().await?,
            stock: self.stock().await?,
        })
    }

    /// Activities dated within the optional bounds, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn activities(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ActivityRecord>, RepoError> {
        let mut query = activities::Entity::find();
        if let Some(from) = from {
            query = query.filter(activities::Column::ActivityDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(activities::Column::ActivityDate.lte(to));
        }

        let rows = query
            .order_by_desc(activities::Column::ActivityDate)
            .order_by_desc(activities::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|a| ActivityRecord {
                id: a.id.into(),
                description: a.description,
                activity_type: a.activity_type.into(),
                amount: a.amount,
                activity_date: a.activity_date,
                created_at: DateTime::<Utc>::from(a.created_at),
            })
            .collect())
    }

    /// Staff assignments joined with each user's branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn assignments(&self) -> Result<Vec<AssignmentRecord>, RepoError> {
        let rows = performance::Entity::find()
            .select_only()
            .column(performance::Column::ActivityId)
            .column(performance::Column::UserId)
            .column(performance::Column::Status)
            .column_as(users::Column::Username, "username")
            .column_as(branches::Column::Id, "branch_id")
            .column_as(branches::Column::Location, "branch_location")
            .join(JoinType::InnerJoin, performance::Relation::Users.def())
            .join(JoinType::LeftJoin, users::Relation::Branches.def())
            .into_model::<AssignmentRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| AssignmentRecord {
                activity_id: r.activity_id.into(),
                user_id: r.user_id.into(),
                username: r.username,
                status: r.status.into(),
                branch_id: r.branch_id.map(Into::into),
                branch_location: r.branch_location,
            })
            .collect())
    }

    /// Branches with their staff counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn branches(&self) -> Result<Vec<BranchRecord>, RepoError> {
        let rows = BranchRepository::new(self.db.clone())
            .list_with_user_count()
            .await?;

        Ok(rows
            .into_iter()
            .map(|b| BranchRecord {
                id: b.id.into(),
                name: b.name,
                location: b.location,
                staff_count: u64::try_from(b.user_count).unwrap_or(0),
            })
            .collect())
    }

    async fn allocations(&self) -> Result<Vec<AllocationRecord>, RepoError> {
        let rows = activity_resources::Entity::find()
            .select_only()
            .column(activity_resources::Column::ActivityId)
            .column(activity_resources::Column::ResourceId)
            .column(activity_resources::Column::AllocatedQuantity)
            .column_as(resources::Column::Name, "resource_name")
            .column_as(resources::Column::Unit, "unit")
            .join(
                JoinType::InnerJoin,
                activity_resources::Relation::Resources.def(),
            )
            .into_model::<AllocationRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| AllocationRecord {
                activity_id: r.activity_id.into(),
                resource_id: r.resource_id.into(),
                resource_name: r.resource_name,
                allocated_quantity: r.allocated_quantity,
                unit: r.unit,
            })
            .collect())
    }

    async fn schedules(&self) -> Result<Vec<ScheduleRecord>, RepoError> {
        let rows = schedules::Entity::find()
            .order_by_asc(schedules::Column::ScheduledDate)
            .order_by_asc(schedules::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|s| ScheduleRecord {
                id: s.id.into(),
                activity_id: s.activity_id.into(),
                scheduled_date: s.scheduled_date,
                notification_message: s.notification_message,
            })
            .collect())
    }

    async fn labor(&self) -> Result<Vec<LaborRecord>, RepoError> {
        let rows = activity_workers::Entity::find()
            .select_only()
            .column(activity_workers::Column::ActivityId)
            .column(activity_workers::Column::WorkerId)
            .column(activity_workers::Column::WorkHours)
            .column_as(workers::Column::HourlyRate, "hourly_rate")
            .join(JoinType::InnerJoin, activity_workers::Relation::Workers.def())
            .into_model::<LaborRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| LaborRecord {
                activity_id: r.activity_id.into(),
                worker_id: r.worker_id.into(),
                work_hours: r.work_hours,
                hourly_rate: r.hourly_rate,
            })
            .collect())
    }

    async fn stock(&self) -> Result<Vec<StockRecord>, RepoError> {
        let rows = resources::Entity::find()
            .order_by_asc(resources::Column::Name)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| StockRecord {
                resource_id: r.id.into(),
                name: r.name,
                quantity: r.quantity,
                unit: r.unit,
                threshold: r.threshold,
            })
            .collect())
    }
}

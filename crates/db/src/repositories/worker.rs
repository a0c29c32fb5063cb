//! Worker and labor repository.

use farmstead_shared::types::{ActivityId, WorkerId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use uuid::Uuid;

use super::error::RepoError;
use crate::entities::{activities, activity_workers, workers};

/// Labor line joined with the worker's name and rate.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct LaborLine {
    /// Worker ID.
    pub worker_id: Uuid,
    /// Worker name.
    pub worker_name: String,
    /// Hours worked.
    pub work_hours: i32,
    /// Worker's hourly rate.
    pub hourly_rate: Decimal,
}

/// Worker repository.
#[derive(Debug, Clone)]
pub struct WorkerRepository {
    db: DatabaseConnection,
}

impl WorkerRepository {
    /// Creates a new worker repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists workers ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<workers::Model>, RepoError> {
        Ok(workers::Entity::find()
            .order_by_asc(workers::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Creates a worker.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(&self, name: &str, hourly_rate: Decimal) -> Result<workers::Model, RepoError> {
        let worker = workers::ActiveModel {
            id: Set(WorkerId::new().into_inner()),
            name: Set(name.to_string()),
            hourly_rate: Set(hourly_rate),
            created_at: Set(chrono::Utc::now().into()),
        };
        Ok(worker.insert(&self.db).await?)
    }

    /// Updates a worker's name and rate.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the worker is missing.
    pub async fn update(
        &self,
        id: WorkerId,
        name: &str,
        hourly_rate: Decimal,
    ) -> Result<workers::Model, RepoError> {
        let worker = workers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepoError::not_found("worker", id))?;

        let mut active: workers::ActiveModel = worker.into();
        active.name = Set(name.to_string());
        active.hourly_rate = Set(hourly_rate);
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a worker and their labor lines.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the worker is missing.
    pub async fn delete(&self, id: WorkerId) -> Result<(), RepoError> {
        let result = workers::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepoError::not_found("worker", id));
        }
        Ok(())
    }

    /// Lists an activity's labor lines.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the activity is missing.
    pub async fn labor_for_activity(&self, activity_id: ActivityId) -> Result<Vec<LaborLine>, RepoError> {
        self.ensure_activity(activity_id).await?;

        let rows = activity_workers::Entity::find()
            .select_only()
            .column(activity_workers::Column::WorkerId)
            .column(activity_workers::Column::WorkHours)
            .column_as(workers::Column::Name, "worker_name")
            .column_as(workers::Column::HourlyRate, "hourly_rate")
            .join(JoinType::InnerJoin, activity_workers::Relation::Workers.def())
            .filter(activity_workers::Column::ActivityId.eq(activity_id.into_inner()))
            .order_by_asc(workers::Column::Name)
            .into_model::<LaborLine>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Logs a worker's hours on an activity.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown activity or worker and
    /// [`RepoError::Conflict`] if the worker already has hours on it.
    pub async fn add_labor(
        &self,
        activity_id: ActivityId,
        worker_id: WorkerId,
        work_hours: i32,
    ) -> Result<activity_workers::Model, RepoError> {
        self.ensure_activity(activity_id).await?;
        if workers::Entity::find_by_id(worker_id.into_inner())
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(RepoError::not_found("worker", worker_id));
        }

        let line = activity_workers::ActiveModel {
            activity_id: Set(activity_id.into_inner()),
            worker_id: Set(worker_id.into_inner()),
            work_hours: Set(work_hours),
            created_at: Set(chrono::Utc::now().into()),
        };

        line.insert(&self.db)
            .await
            .map_err(|e| RepoError::from_write(e, "worker already has hours on this activity"))
    }

    /// Removes a labor line.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if no such line exists.
    pub async fn remove_labor(&self, activity_id: ActivityId, worker_id: WorkerId) -> Result<(), RepoError> {
        let result = activity_workers::Entity::delete_many()
            .filter(activity_workers::Column::ActivityId.eq(activity_id.into_inner()))
            .filter(activity_workers::Column::WorkerId.eq(worker_id.into_inner()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepoError::not_found("labor line", worker_id));
        }
        Ok(())
    }

    async fn ensure_activity(&self, activity_id: ActivityId) -> Result<(), RepoError> {
        activities::Entity::find_by_id(activity_id.into_inner())
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("activity", activity_id))
    }
}

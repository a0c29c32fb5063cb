//! Schedule repository.

use chrono::NaiveDate;
use farmstead_shared::types::{ActivityId, ScheduleId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use uuid::Uuid;

use super::error::RepoError;
use crate::entities::{activities, schedules};

/// Schedule row joined with its activity description.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct ScheduleWithActivity {
    /// Schedule ID.
    pub id: Uuid,
    /// Activity ID.
    pub activity_id: Uuid,
    /// Due date.
    pub scheduled_date: NaiveDate,
    /// Notification text.
    pub notification_message: Option<String>,
    /// Whether the notification was acknowledged.
    pub notification_sent: bool,
    /// Activity description; absent if the activity row is gone.
    pub activity_description: Option<String>,
}

/// Schedule repository.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    db: DatabaseConnection,
}

impl ScheduleRepository {
    /// Creates a new schedule repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists schedules in date order, optionally bounded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ScheduleWithActivity>, RepoError> {
        let mut query = schedules::Entity::find()
            .select_only()
            .column(schedules::Column::Id)
            .column(schedules::Column::ActivityId)
            .column(schedules::Column::ScheduledDate)
            .column(schedules::Column::NotificationMessage)
            .column(schedules::Column::NotificationSent)
            .column_as(activities::Column::Description, "activity_description")
            .join(JoinType::LeftJoin, schedules::Relation::Activities.def());

        if let Some(from) = from {
            query = query.filter(schedules::Column::ScheduledDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(schedules::Column::ScheduledDate.lte(to));
        }

        let rows = query
            .order_by_asc(schedules::Column::ScheduledDate)
            .order_by_asc(schedules::Column::CreatedAt)
            .into_model::<ScheduleWithActivity>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Schedules an existing activity.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the activity is missing.
    pub async fn create(
        &self,
        activity_id: ActivityId,
        scheduled_date: NaiveDate,
        notification_message: Option<String>,
    ) -> Result<schedules::Model, RepoError> {
        if activities::Entity::find_by_id(activity_id.into_inner())
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(RepoError::not_found("activity", activity_id));
        }

        let schedule = schedules::ActiveModel {
            id: Set(ScheduleId::new().into_inner()),
            activity_id: Set(activity_id.into_inner()),
            scheduled_date: Set(scheduled_date),
            notification_message: Set(notification_message),
            notification_sent: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(schedule.insert(&self.db).await?)
    }

    /// Marks a schedule's notification as sent.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the schedule is missing.
    pub async fn acknowledge(&self, id: ScheduleId) -> Result<schedules::Model, RepoError> {
        let schedule = schedules::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepoError::not_found("schedule", id))?;

        let mut active: schedules::ActiveModel = schedule.into();
        active.notification_sent = Set(true);
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the schedule is missing.
    pub async fn delete(&self, id: ScheduleId) -> Result<(), RepoError> {
        let result = schedules::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepoError::not_found("schedule", id));
        }
        Ok(())
    }
}

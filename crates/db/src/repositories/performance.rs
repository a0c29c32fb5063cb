//! Performance (staff assignment) repository.

use farmstead_core::domain;
use farmstead_shared::types::{ActivityId, PerformanceId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, prelude::DateTimeWithTimeZone,
};
use serde::Serialize;
use uuid::Uuid;

use super::error::RepoError;
use crate::entities::{
    activities, performance,
    sea_orm_active_enums::{ActivityType, PerformanceStatus},
    users,
};

/// Performance record joined with user and activity.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct PerformanceWithDetails {
    /// Record ID.
    pub id: Uuid,
    /// Assigned user.
    pub user_id: Uuid,
    /// Username.
    pub username: String,
    /// Activity ID.
    pub activity_id: Uuid,
    /// Activity description.
    pub activity: String,
    /// Activity type.
    pub activity_type: ActivityType,
    /// Progress.
    pub status: PerformanceStatus,
    /// Last status change.
    pub updated_at: DateTimeWithTimeZone,
}

/// Performance repository.
#[derive(Debug, Clone)]
pub struct PerformanceRepository {
    db: DatabaseConnection,
}

impl PerformanceRepository {
    /// Creates a new performance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists records, optionally for one user, newest activity first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Option<UserId>) -> Result<Vec<PerformanceWithDetails>, RepoError> {
        let mut query = performance::Entity::find()
            .select_only()
            .column(performance::Column::Id)
            .column(performance::Column::UserId)
            .column(performance::Column::ActivityId)
            .column(performance::Column::Status)
            .column(performance::Column::UpdatedAt)
            .column_as(users::Column::Username, "username")
            .column_as(activities::Column::Description, "activity")
            .column_as(activities::Column::ActivityType, "activity_type")
            .join(JoinType::InnerJoin, performance::Relation::Users.def())
            .join(JoinType::InnerJoin, performance::Relation::Activities.def());

        if let Some(user_id) = user_id {
            query = query.filter(performance::Column::UserId.eq(user_id.into_inner()));
        }

        let rows = query
            .order_by_desc(activities::Column::ActivityDate)
            .order_by_asc(users::Column::Username)
            .into_model::<PerformanceWithDetails>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Finds a record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: PerformanceId) -> Result<Option<performance::Model>, RepoError> {
        Ok(performance::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Assigns a user to an activity.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown user or activity and
    /// [`RepoError::Conflict`] if the assignment already exists.
    pub async fn assign(
        &self,
        user_id: UserId,
        activity_id: ActivityId,
        status: domain::PerformanceStatus,
    ) -> Result<performance::Model, RepoError> {
        if users::Entity::find_by_id(user_id.into_inner())
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(RepoError::not_found("user", user_id));
        }
        if activities::Entity::find_by_id(activity_id.into_inner())
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(RepoError::not_found("activity", activity_id));
        }

        let now = chrono::Utc::now().into();
        let record = performance::ActiveModel {
            id: Set(PerformanceId::new().into_inner()),
            user_id: Set(user_id.into_inner()),
            activity_id: Set(activity_id.into_inner()),
            status: Set(status.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| RepoError::from_write(e, "user is already assigned to this activity"))
    }

    /// Changes a record's status.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the record is missing.
    pub async fn update_status(
        &self,
        id: PerformanceId,
        status: domain::PerformanceStatus,
    ) -> Result<performance::Model, RepoError> {
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::not_found("performance record", id))?;

        let mut active: performance::ActiveModel = record.into();
        active.status = Set(status.into());
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }
}

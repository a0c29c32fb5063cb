//! Activity repository.
//!
//! Creating a future-dated activity also writes its schedule entry in the
//! same database transaction.

use chrono::NaiveDate;
use farmstead_core::{domain, scheduling::PlannedSchedule};
use farmstead_shared::types::{ActivityId, PageRequest, ScheduleId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::error::RepoError;
use crate::entities::{activities, schedules};

/// Filter options for listing activities.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    /// Only this type.
    pub activity_type: Option<domain::ActivityType>,
    /// Dated on or after.
    pub from: Option<NaiveDate>,
    /// Dated on or before.
    pub to: Option<NaiveDate>,
}

/// Validated activity fields, used for both create and update.
#[derive(Debug, Clone)]
pub struct ActivityInput {
    /// Description.
    pub description: String,
    /// Type.
    pub activity_type: domain::ActivityType,
    /// Amount.
    pub amount: Decimal,
    /// Activity date.
    pub activity_date: NaiveDate,
}

/// Activity repository.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    db: DatabaseConnection,
}

impl ActivityRepository {
    /// Creates a new activity repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts an activity and, when planned, its schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if either insert fails; nothing is written then.
    pub async fn create(
        &self,
        input: ActivityInput,
        schedule: Option<PlannedSchedule>,
    ) -> Result<(activities::Model, Option<schedules::Model>), RepoError> {
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();

        let activity = activities::ActiveModel {
            id: Set(ActivityId::new().into_inner()),
            description: Set(input.description),
            activity_type: Set(input.activity_type.into()),
            amount: Set(input.amount),
            activity_date: Set(input.activity_date),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let scheduled = match schedule {
            Some(plan) => Some(
                schedules::ActiveModel {
                    id: Set(ScheduleId::new().into_inner()),
                    activity_id: Set(activity.id),
                    scheduled_date: Set(plan.scheduled_date),
                    notification_message: Set(Some(plan.notification_message)),
                    notification_sent: Set(false),
                    created_at: Set(now),
                }
                .insert(&txn)
                .await?,
            ),
            None => None,
        };

        txn.commit().await?;
        Ok((activity, scheduled))
    }

    /// Lists one page of activities, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ActivityFilter,
        page: &PageRequest,
    ) -> Result<(Vec<activities::Model>, u64), RepoError> {
        let mut query = activities::Entity::find();
        if let Some(activity_type) = filter.activity_type {
            query = query.filter(
                activities::Column::ActivityType
                    .eq(crate::entities::sea_orm_active_enums::ActivityType::from(activity_type)),
            );
        }
        if let Some(from) = filter.from {
            query = query.filter(activities::Column::ActivityDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(activities::Column::ActivityDate.lte(to));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(activities::Column::ActivityDate)
            .order_by_desc(activities::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Finds an activity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: ActivityId) -> Result<Option<activities::Model>, RepoError> {
        Ok(activities::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Replaces an activity's fields.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the activity is missing.
    pub async fn update(
        &self,
        id: ActivityId,
        input: ActivityInput,
    ) -> Result<activities::Model, RepoError> {
        let activity = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::not_found("activity", id))?;

        let mut active: activities::ActiveModel = activity.into();
        active.description = Set(input.description);
        active.activity_type = Set(input.activity_type.into());
        active.amount = Set(input.amount);
        active.activity_date = Set(input.activity_date);

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an activity together with its allocations, schedules,
    /// performance records, and labor lines.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the activity is missing.
    pub async fn delete(&self, id: ActivityId) -> Result<(), RepoError> {
        let result = activities::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepoError::not_found("activity", id));
        }
        Ok(())
    }
}

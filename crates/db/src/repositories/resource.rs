//! Resource repository with activity allocations.

use farmstead_core::domain;
use farmstead_shared::types::{ActivityId, ResourceId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait, prelude::DateTimeWithTimeZone,
};
use serde::Serialize;
use uuid::Uuid;

use super::error::RepoError;
use crate::entities::{activities, activity_resources, resources};

/// Validated resource fields.
#[derive(Debug, Clone)]
pub struct ResourceInput {
    /// Name.
    pub name: String,
    /// Quantity on hand.
    pub quantity: i32,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Inventory or human.
    pub resource_type: domain::ResourceType,
    /// Restock alert level.
    pub threshold: i32,
}

/// Allocation of the resource to an activity.
#[derive(Debug, Clone, Copy)]
pub struct AllocationInput {
    /// Target activity.
    pub activity_id: ActivityId,
    /// Quantity set aside.
    pub allocated_quantity: i32,
}

/// Allocation joined with its activity's description.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct AllocationWithActivity {
    /// Allocation ID.
    pub id: Uuid,
    /// Activity ID.
    pub activity_id: Uuid,
    /// Activity description.
    pub activity_description: String,
    /// Quantity set aside.
    pub allocated_quantity: i32,
    /// When the allocation was made.
    pub created_at: DateTimeWithTimeZone,
}

/// Resource repository.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    db: DatabaseConnection,
}

impl ResourceRepository {
    /// Creates a new resource repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a resource, optionally allocating it to an activity.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the allocation names an unknown
    /// activity.
    pub async fn create(
        &self,
        input: ResourceInput,
        allocation: Option<AllocationInput>,
    ) -> Result<resources::Model, RepoError> {
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();

        let resource = resources::ActiveModel {
            id: Set(ResourceId::new().into_inner()),
            name: Set(input.name),
            quantity: Set(input.quantity),
            unit: Set(input.unit),
            resource_type: Set(input.resource_type.into()),
            threshold: Set(input.threshold),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if let Some(allocation) = allocation {
            Self::upsert_allocation(&txn, resource.id, allocation).await?;
        }

        txn.commit().await?;
        Ok(resource)
    }

    /// Lists all resources ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<resources::Model>, RepoError> {
        Ok(resources::Entity::find()
            .order_by_asc(resources::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Finds a resource by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: ResourceId) -> Result<Option<resources::Model>, RepoError> {
        Ok(resources::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Replaces a resource's fields and upserts its allocation when given.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the resource or the allocation's
    /// activity is missing.
    pub async fn update(
        &self,
        id: ResourceId,
        input: ResourceInput,
        allocation: Option<AllocationInput>,
    ) -> Result<resources::Model, RepoError> {
        let txn = self.db.begin().await?;

        let resource = resources::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| RepoError::not_found("resource", id))?;

        let mut active: resources::ActiveModel = resource.into();
        active.name = Set(input.name);
        active.quantity = Set(input.quantity);
        active.unit = Set(input.unit);
        active.resource_type = Set(input.resource_type.into());
        active.threshold = Set(input.threshold);
        active.updated_at = Set(chrono::Utc::now().into());
        let resource = active.update(&txn).await?;

        if let Some(allocation) = allocation {
            Self::upsert_allocation(&txn, resource.id, allocation).await?;
        }

        txn.commit().await?;
        Ok(resource)
    }

    /// Deletes a resource and its allocations.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the resource is missing.
    pub async fn delete(&self, id: ResourceId) -> Result<(), RepoError> {
        let result = resources::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepoError::not_found("resource", id));
        }
        Ok(())
    }

    /// Lists a resource's allocations with activity descriptions.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the resource is missing.
    pub async fn allocations(
        &self,
        id: ResourceId,
    ) -> Result<Vec<AllocationWithActivity>, RepoError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::not_found("resource", id));
        }

        let rows = activity_resources::Entity::find()
            .select_only()
            .column(activity_resources::Column::Id)
            .column(activity_resources::Column::ActivityId)
            .column(activity_resources::Column::AllocatedQuantity)
            .column(activity_resources::Column::CreatedAt)
            .column_as(activities::Column::Description, "activity_description")
            .join(
                JoinType::InnerJoin,
                activity_resources::Relation::Activities.def(),
            )
            .filter(activity_resources::Column::ResourceId.eq(id.into_inner()))
            .order_by_asc(activities::Column::ActivityDate)
            .into_model::<AllocationWithActivity>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    async fn upsert_allocation<C: ConnectionTrait>(
        conn: &C,
        resource_id: Uuid,
        allocation: AllocationInput,
    ) -> Result<(), RepoError> {
        let activity_id = allocation.activity_id.into_inner();
        if activities::Entity::find_by_id(activity_id)
            .one(conn)
            .await?
            .is_none()
        {
            return Err(RepoError::not_found("activity", allocation.activity_id));
        }

        let existing = activity_resources::Entity::find()
            .filter(activity_resources::Column::ActivityId.eq(activity_id))
            .filter(activity_resources::Column::ResourceId.eq(resource_id))
            .one(conn)
            .await?;

        match existing {
            Some(row) => {
                let mut active: activity_resources::ActiveModel = row.into();
                active.allocated_quantity = Set(allocation.allocated_quantity);
                active.update(conn).await?;
            }
            None => {
                activity_resources::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    activity_id: Set(activity_id),
                    resource_id: Set(resource_id),
                    allocated_quantity: Set(allocation.allocated_quantity),
                    created_at: Set(chrono::Utc::now().into()),
                }
                .insert(conn)
                .await?;
            }
        }
        Ok(())
    }
}

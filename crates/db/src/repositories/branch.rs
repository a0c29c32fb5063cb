//! Branch repository.

use farmstead_shared::types::BranchId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    prelude::DateTimeWithTimeZone,
};
use serde::Serialize;
use uuid::Uuid;

use super::error::RepoError;
use crate::entities::{branches, users};

/// Branch with the number of users assigned to it.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct BranchWithUserCount {
    /// Branch ID.
    pub id: Uuid,
    /// Branch name.
    pub name: String,
    /// Branch location.
    pub location: String,
    /// Assigned users.
    pub user_count: i64,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Fields to change on a branch.
#[derive(Debug, Clone, Default)]
pub struct UpdateBranchInput {
    /// New name.
    pub name: Option<String>,
    /// New location.
    pub location: Option<String>,
}

const DUPLICATE_NAME: &str = "a branch with this name already exists";

/// Branch repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BranchRepository {
    db: DatabaseConnection,
}

impl BranchRepository {
    /// Creates a new branch repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a branch.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Conflict`] if the name is taken.
    pub async fn create(&self, name: &str, location: &str) -> Result<branches::Model, RepoError> {
        let now = chrono::Utc::now().into();
        let branch = branches::ActiveModel {
            id: Set(BranchId::new().into_inner()),
            name: Set(name.to_string()),
            location: Set(location.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        branch
            .insert(&self.db)
            .await
            .map_err(|e| RepoError::from_write(e, DUPLICATE_NAME))
    }

    /// Lists every branch with its user count, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_with_user_count(&self) -> Result<Vec<BranchWithUserCount>, RepoError> {
        let rows = branches::Entity::find()
            .select_only()
            .column(branches::Column::Id)
            .column(branches::Column::Name)
            .column(branches::Column::Location)
            .column(branches::Column::CreatedAt)
            .column(branches::Column::UpdatedAt)
            .column_as(users::Column::Id.count(), "user_count")
            .join(JoinType::LeftJoin, branches::Relation::Users.def())
            .group_by(branches::Column::Id)
            .order_by_asc(branches::Column::Name)
            .into_model::<BranchWithUserCount>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Finds a branch by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: BranchId) -> Result<Option<branches::Model>, RepoError> {
        Ok(branches::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Updates name and/or location.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the branch is missing and
    /// [`RepoError::Conflict`] if the new name is taken.
    pub async fn update(
        &self,
        id: BranchId,
        input: UpdateBranchInput,
    ) -> Result<branches::Model, RepoError> {
        let branch = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::not_found("branch", id))?;

        let mut active: branches::ActiveModel = branch.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| RepoError::from_write(e, DUPLICATE_NAME))
    }

    /// Deletes a branch that has no users.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the branch is missing and
    /// [`RepoError::Conflict`] if users are still assigned to it.
    pub async fn delete(&self, id: BranchId) -> Result<(), RepoError> {
        let assigned = users::Entity::find()
            .filter(users::Column::BranchId.eq(id.into_inner()))
            .count(&self.db)
            .await?;
        if assigned > 0 {
            return Err(RepoError::Conflict(format!(
                "branch still has {assigned} assigned user(s)"
            )));
        }

        let result = branches::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::from_write(e, "branch is still referenced"))?;
        if result.rows_affected == 0 {
            return Err(RepoError::not_found("branch", id));
        }
        Ok(())
    }
}

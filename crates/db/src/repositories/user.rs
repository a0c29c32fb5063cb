//! User repository for database operations.

use farmstead_shared::types::{BranchId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, prelude::DateTimeWithTimeZone,
};
use serde::Serialize;
use uuid::Uuid;

use super::error::RepoError;
use crate::entities::{branches, sea_orm_active_enums::UserRole, users};

/// User joined with their branch name.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct UserWithBranch {
    /// User ID.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Email.
    pub email: String,
    /// Role.
    pub role: UserRole,
    /// Branch ID.
    pub branch_id: Uuid,
    /// Branch name.
    pub branch_name: Option<String>,
    /// Profile image path.
    pub image: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login name.
    pub username: String,
    /// Email, already normalized.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Branch the user belongs to.
    pub branch_id: BranchId,
    /// Role.
    pub role: UserRole,
    /// Profile image path.
    pub image: Option<String>,
}

/// Input for updating a user. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New email.
    pub email: Option<String>,
    /// New password hash.
    pub password_hash: Option<String>,
    /// New branch.
    pub branch_id: Option<BranchId>,
    /// New role.
    pub role: Option<UserRole>,
    /// New image path; `Some(None)` clears it.
    pub image: Option<Option<String>>,
}

const DUPLICATE_USER: &str = "username or email already exists";

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, RepoError> {
        Ok(users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, RepoError> {
        Ok(users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown branch and
    /// [`RepoError::Conflict`] for a taken username or email.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, RepoError> {
        self.ensure_branch(input.branch_id).await?;

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            branch_id: Set(input.branch_id.into_inner()),
            role: Set(input.role),
            image: Set(input.image),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db)
            .await
            .map_err(|e| RepoError::from_write(e, DUPLICATE_USER))
    }

    /// Lists users with their branch name, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_with_branch(&self) -> Result<Vec<UserWithBranch>, RepoError> {
        let rows = users::Entity::find()
            .select_only()
            .column(users::Column::Id)
            .column(users::Column::Username)
            .column(users::Column::Email)
            .column(users::Column::Role)
            .column(users::Column::BranchId)
            .column(users::Column::Image)
            .column(users::Column::CreatedAt)
            .column_as(branches::Column::Name, "branch_name")
            .join(JoinType::LeftJoin, users::Relation::Branches.def())
            .order_by_asc(users::Column::Username)
            .into_model::<UserWithBranch>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Updates a user.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for a missing user or branch and
    /// [`RepoError::Conflict`] for a taken email.
    pub async fn update(&self, id: UserId, input: UpdateUserInput) -> Result<users::Model, RepoError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::not_found("user", id))?;

        if let Some(branch_id) = input.branch_id {
            self.ensure_branch(branch_id).await?;
        }

        let mut active: users::ActiveModel = user.into();
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = input.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(branch_id) = input.branch_id {
            active.branch_id = Set(branch_id.into_inner());
        }
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(image) = input.image {
            active.image = Set(image);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| RepoError::from_write(e, DUPLICATE_USER))
    }

    /// Deletes a user and, by cascade, their performance records.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the user is missing.
    pub async fn delete(&self, id: UserId) -> Result<(), RepoError> {
        let result = users::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepoError::not_found("user", id));
        }
        Ok(())
    }

    async fn ensure_branch(&self, branch_id: BranchId) -> Result<(), RepoError> {
        branches::Entity::find_by_id(branch_id.into_inner())
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("branch", branch_id))
    }
}

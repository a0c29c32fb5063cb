//! Error type shared by all repositories.

use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

/// Errors returned by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of row.
        entity: &'static str,
        /// Requested ID.
        id: Uuid,
    },

    /// The write would violate a uniqueness or reference rule.
    #[error("{0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<Uuid>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Turns a unique or foreign-key violation into [`RepoError::Conflict`].
    pub(crate) fn from_write(err: DbErr, conflict: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_) | SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::Conflict(conflict.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_constraint_errors_stay_database() {
        let err = RepoError::from_write(DbErr::Custom("boom".into()), "duplicate");
        assert!(matches!(err, RepoError::Database(_)));
    }

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        let err = RepoError::not_found("branch", id);
        assert_eq!(
            err.to_string(),
            "branch not found: 00000000-0000-0000-0000-000000000000"
        );
    }
}

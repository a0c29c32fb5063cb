//! Authentication, password hashing, and roles.

mod password;

pub use password::{
    MIN_PASSWORD_LENGTH, PasswordError, check_password_policy, hash_password, verify_password,
};

use serde::{Deserialize, Serialize};

/// User roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum UserRole {
    /// Manages branches, users, resources, and assignments.
    Admin,
    /// Logs activities, views schedules, tracks their own performance.
    #[default]
    Staff,
}

impl UserRole {
    /// Returns true if this role can manage branches, users, and resources.
    #[must_use]
    pub const fn can_manage(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if this role may read another user's records.
    #[must_use]
    pub const fn can_view_all_staff(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = crate::domain::ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            // Older clients sent "user" for staff accounts.
            "staff" | "user" => Ok(Self::Staff),
            _ => Err(crate::domain::ParseEnumError::new("role", s)),
        }
    }
}

crate::domain::try_from_string!(UserRole);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.can_manage());
        assert!(!UserRole::Staff.can_manage());
        assert!(UserRole::Admin.can_view_all_staff());
        assert!(!UserRole::Staff.can_view_all_staff());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("staff".parse::<UserRole>().unwrap(), UserRole::Staff);
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::Staff);
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserializes_any_case() {
        let role: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        let role: UserRole = serde_json::from_str("\"User\"").unwrap();
        assert_eq!(role, UserRole::Staff);
        assert!(serde_json::from_str::<UserRole>("\"owner\"").is_err());
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_default_role_is_staff() {
        assert_eq!(UserRole::default(), UserRole::Staff);
    }
}

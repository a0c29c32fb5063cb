//! Postgres enum types and their conversions to the core domain enums.

use farmstead_core::{auth, domain};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "staff")]
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "activity_type")]
pub enum ActivityType {
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "neutral")]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "resource_type")]
pub enum ResourceType {
    #[sea_orm(string_value = "inventory")]
    Inventory,
    #[sea_orm(string_value = "human")]
    Human,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "performance_status")]
pub enum PerformanceStatus {
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl From<UserRole> for auth::UserRole {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Admin => Self::Admin,
            UserRole::Staff => Self::Staff,
        }
    }
}

impl From<auth::UserRole> for UserRole {
    fn from(value: auth::UserRole) -> Self {
        match value {
            auth::UserRole::Admin => Self::Admin,
            auth::UserRole::Staff => Self::Staff,
        }
    }
}

impl From<ActivityType> for domain::ActivityType {
    fn from(value: ActivityType) -> Self {
        match value {
            ActivityType::Revenue => Self::Revenue,
            ActivityType::Expense => Self::Expense,
            ActivityType::Neutral => Self::Neutral,
        }
    }
}

impl From<domain::ActivityType> for ActivityType {
    fn from(value: domain::ActivityType) -> Self {
        match value {
            domain::ActivityType::Revenue => Self::Revenue,
            domain::ActivityType::Expense => Self::Expense,
            domain::ActivityType::Neutral => Self::Neutral,
        }
    }
}

impl From<ResourceType> for domain::ResourceType {
    fn from(value: ResourceType) -> Self {
        match value {
            ResourceType::Inventory => Self::Inventory,
            ResourceType::Human => Self::Human,
        }
    }
}

impl From<domain::ResourceType> for ResourceType {
    fn from(value: domain::ResourceType) -> Self {
        match value {
            domain::ResourceType::Inventory => Self::Inventory,
            domain::ResourceType::Human => Self::Human,
        }
    }
}

impl From<PerformanceStatus> for domain::PerformanceStatus {
    fn from(value: PerformanceStatus) -> Self {
        match value {
            PerformanceStatus::Assigned => Self::Assigned,
            PerformanceStatus::InProgress => Self::InProgress,
            PerformanceStatus::Completed => Self::Completed,
        }
    }
}

impl From<domain::PerformanceStatus> for PerformanceStatus {
    fn from(value: domain::PerformanceStatus) -> Self {
        match value {
            domain::PerformanceStatus::Assigned => Self::Assigned,
            domain::PerformanceStatus::InProgress => Self::InProgress,
            domain::PerformanceStatus::Completed => Self::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trip() {
        for t in domain::ActivityType::ALL {
            assert_eq!(domain::ActivityType::from(ActivityType::from(t)), t);
        }
        for s in [
            domain::PerformanceStatus::Assigned,
            domain::PerformanceStatus::InProgress,
            domain::PerformanceStatus::Completed,
        ] {
            assert_eq!(domain::PerformanceStatus::from(PerformanceStatus::from(s)), s);
        }
        assert_eq!(
            auth::UserRole::from(UserRole::from(auth::UserRole::Admin)),
            auth::UserRole::Admin
        );
    }

    #[test]
    fn test_db_values_match_wire_names() {
        assert_eq!(PerformanceStatus::InProgress.to_value(), "in_progress");
        assert_eq!(ActivityType::Neutral.to_value(), "neutral");
        assert_eq!(ResourceType::Human.to_value(), "human");
    }
}

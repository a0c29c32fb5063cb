//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `UserId` where an `ActivityId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(BranchId, "Unique identifier for a farm branch.");
typed_id!(UserId, "Unique identifier for a user.");
typed_id!(ActivityId, "Unique identifier for a logged activity.");
typed_id!(ResourceId, "Unique identifier for a resource.");
typed_id!(ScheduleId, "Unique identifier for a schedule entry.");
typed_id!(PerformanceId, "Unique identifier for a performance record.");
typed_id!(WorkerId, "Unique identifier for a labor worker.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(ActivityId::new(), ActivityId::new());
    }

    #[test]
    fn test_round_trip_through_string() {
        let id = BranchId::new();
        let parsed: BranchId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let uuid = Uuid::nil();
        let json = serde_json::to_string(&UserId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn test_invalid_string_rejected() {
        assert!("not-a-uuid".parse::<WorkerId>().is_err());
    }
}

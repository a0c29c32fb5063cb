//! Domain enums shared by every layer.
//!
//! Parsing is case-insensitive so that clients may send either the wire name
//! (`revenue`) or the display label (`Revenue`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Implements `TryFrom<String>` through `FromStr` so that JSON bodies accept
/// the same spellings as query strings.
macro_rules! try_from_string {
    ($($ty:ty),+ $(,)?) => {$(
        impl TryFrom<String> for $ty {
            type Error = $crate::domain::ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    )+};
}

pub(crate) use try_from_string;

try_from_string!(ActivityType, ResourceType, PerformanceStatus);

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Classification of a logged activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ActivityType {
    /// Money coming in (harvest sale, produce delivery).
    Revenue,
    /// Money going out (feed, fertilizer, repairs).
    Expense,
    /// Work with no direct monetary effect.
    Neutral,
}

impl ActivityType {
    /// All variants in report order.
    pub const ALL: [Self; 3] = [Self::Revenue, Self::Expense, Self::Neutral];

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Expense => "expense",
            Self::Neutral => "neutral",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::Expense => "Expense",
            Self::Neutral => "Neutral",
        }
    }

    /// Returns true for activities that affect profit.
    #[must_use]
    pub const fn is_monetary(&self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "revenue" => Ok(Self::Revenue),
            "expense" | "expenses" => Ok(Self::Expense),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ParseEnumError::new("activity type", s)),
        }
    }
}

/// Kind of resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ResourceType {
    /// Consumables and equipment counted in units.
    #[default]
    Inventory,
    /// People allocated to activities.
    Human,
}

impl ResourceType {
    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Human => "human",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "inventory" => Ok(Self::Inventory),
            "human" => Ok(Self::Human),
            _ => Err(ParseEnumError::new("resource type", s)),
        }
    }
}

/// Progress of a staff member on an assigned activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PerformanceStatus {
    /// Assigned but not started.
    #[default]
    Assigned,
    /// Work has started.
    InProgress,
    /// Work is done.
    Completed,
}

impl PerformanceStatus {
    /// Snake-case wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Display label used inside report cells.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for PerformanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PerformanceStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "assigned" => Ok(Self::Assigned),
            "inprogress" => Ok(Self::InProgress),
            "completed" | "complete" | "done" => Ok(Self::Completed),
            _ => Err(ParseEnumError::new("performance status", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("revenue", ActivityType::Revenue)]
    #[case("Revenue", ActivityType::Revenue)]
    #[case(" EXPENSE ", ActivityType::Expense)]
    #[case("Neutral", ActivityType::Neutral)]
    fn test_activity_type_parse(#[case] input: &str, #[case] expected: ActivityType) {
        assert_eq!(input.parse::<ActivityType>().unwrap(), expected);
    }

    #[rstest]
    #[case("Assigned", PerformanceStatus::Assigned)]
    #[case("In Progress", PerformanceStatus::InProgress)]
    #[case("in_progress", PerformanceStatus::InProgress)]
    #[case("completed", PerformanceStatus::Completed)]
    fn test_status_parse(#[case] input: &str, #[case] expected: PerformanceStatus) {
        assert_eq!(input.parse::<PerformanceStatus>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_values_rejected() {
        let err = "harvest".parse::<ActivityType>().unwrap_err();
        assert_eq!(err.to_string(), "invalid activity type: harvest");
        assert!("machine".parse::<ResourceType>().is_err());
        assert!("paused".parse::<PerformanceStatus>().is_err());
    }

    #[rstest]
    #[case("\"REVENUE\"", ActivityType::Revenue)]
    #[case("\"expenses\"", ActivityType::Expense)]
    #[case("\" Neutral \"", ActivityType::Neutral)]
    fn test_serde_activity_type_any_case(#[case] json: &str, #[case] expected: ActivityType) {
        assert_eq!(serde_json::from_str::<ActivityType>(json).unwrap(), expected);
    }

    #[test]
    fn test_serde_any_case_for_every_enum() {
        let s: PerformanceStatus = serde_json::from_str("\"IN PROGRESS\"").unwrap();
        assert_eq!(s, PerformanceStatus::InProgress);
        let r: ResourceType = serde_json::from_str("\"HUMAN\"").unwrap();
        assert_eq!(r, ResourceType::Human);
        let err = serde_json::from_str::<ActivityType>("\"gift\"").unwrap_err();
        assert!(err.to_string().contains("invalid activity type: gift"));
    }

    #[test]
    fn test_serde_accepts_labels() {
        let t: ActivityType = serde_json::from_str("\"Expense\"").unwrap();
        assert_eq!(t, ActivityType::Expense);
        let s: PerformanceStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(s, PerformanceStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&PerformanceStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn test_neutral_is_not_monetary() {
        assert!(ActivityType::Revenue.is_monetary());
        assert!(ActivityType::Expense.is_monetary());
        assert!(!ActivityType::Neutral.is_monetary());
    }
}

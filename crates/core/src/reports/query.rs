//! Search and sort over activity report rows.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::dashboard::ActivityReportRow;

/// Sortable report columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Activity ID (time-ordered).
    ActivityId,
    /// Description, case-insensitive.
    Description,
    /// Activity type.
    ActivityType,
    /// Amount.
    Amount,
    /// Activity date.
    #[default]
    ActivityDate,
    /// Creation timestamp.
    CreatedAt,
}

impl std::str::FromStr for SortKey {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "activity_id" => Ok(Self::ActivityId),
            "description" => Ok(Self::Description),
            "activity_type" => Ok(Self::ActivityType),
            "amount" => Ok(Self::Amount),
            "activity_date" => Ok(Self::ActivityDate),
            "created_at" => Ok(Self::CreatedAt),
            other => Err(ReportError::InvalidSortKey(other.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ReportError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Parsed report parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    /// Case-insensitive substring filter.
    pub search: Option<String>,
    /// Sort column.
    pub sort: SortKey,
    /// Sort direction.
    pub order: SortOrder,
}

impl ReportQuery {
    /// Parses raw query-string values, applying defaults for absent ones.
    pub fn parse(
        search: Option<&str>,
        sort: Option<&str>,
        order: Option<&str>,
    ) -> Result<Self, ReportError> {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let sort = match sort.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse()?,
            None => SortKey::default(),
        };
        let order = match order.map(str::trim).filter(|s| !s.is_empty()) {
            Some(o) => o.parse()?,
            None => SortOrder::default(),
        };
        Ok(Self {
            search,
            sort,
            order,
        })
    }

    /// Returns true if the row matches the search term.
    ///
    /// Matches against description, type, and every list cell.
    #[must_use]
    pub fn matches(&self, row: &ActivityReportRow) -> bool {
        let Some(needle) = self.search.as_deref() else {
            return true;
        };
        let hit = |s: &str| s.to_lowercase().contains(needle);

        hit(&row.description)
            || hit(row.activity_type.as_str())
            || row.resources_used.iter().any(|s| hit(s))
            || row.assigned_staff.iter().any(|s| hit(s))
            || row.involved_branches.iter().any(|s| hit(s))
    }

    /// Filters and sorts rows. Ties keep their input order.
    #[must_use]
    pub fn apply(&self, rows: Vec<ActivityReportRow>) -> Vec<ActivityReportRow> {
        let mut rows: Vec<ActivityReportRow> = rows.into_iter().filter(|r| self.matches(r)).collect();
        rows.sort_by(|a, b| {
            let ord = Self::compare(self.sort, a, b);
            match self.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        rows
    }

    fn compare(key: SortKey, a: &ActivityReportRow, b: &ActivityReportRow) -> Ordering {
        match key {
            SortKey::ActivityId => a.activity_id.cmp(&b.activity_id),
            SortKey::Description => a
                .description
                .to_lowercase()
                .cmp(&b.description.to_lowercase()),
            SortKey::ActivityType => a.activity_type.as_str().cmp(b.activity_type.as_str()),
            SortKey::Amount => a.amount.cmp(&b.amount),
            SortKey::ActivityDate => a
                .activity_date
                .cmp(&b.activity_date)
                .then(a.created_at.cmp(&b.created_at)),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

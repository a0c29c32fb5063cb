//! Derived report views.
//!
//! Everything here works on rows already produced by the dashboard
//! aggregation or fetched flat from the database:
//! - Searchable, sortable activity report
//! - CSV export of that report
//! - Per-branch activity report
//! - Monthly revenue and expense buckets

pub mod csv;
pub mod error;
pub mod query;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use query::{ReportQuery, SortKey, SortOrder};
pub use service::ReportService;
pub use types::*;

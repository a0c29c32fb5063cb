//! Dashboard aggregation.
//!
//! Joins activities with their resource allocations, staff assignments,
//! schedules, and labor into the summary cards, per-type breakdown, activity
//! table, and notification feed shown on the farm dashboard. All inputs are
//! flat rows as fetched by the repository layer; nothing here touches a
//! database.

pub mod service;
pub mod types;


pub use service::{DashboardService, format_allocation, format_assignment, is_low_stock, labor_cost};
pub use types::*;

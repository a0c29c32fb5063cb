//! Core business logic for Farmstead.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and aggregations live here.
//!
//! # Modules
//!
//! - `auth` - Roles and password hashing
//! - `domain` - Activity, resource, and performance enums
//! - `validation` - Input rules
//! - `scheduling` - Schedules for future-dated activities
//! - `dashboard` - Dashboard aggregation over activities and their relations
//! - `reports` - Activity report search/sort, CSV export, branch and monthly reports
//! - `performance` - Staff performance chart

pub mod auth;
pub mod dashboard;
pub mod domain;
pub mod performance;
pub mod reports;
pub mod scheduling;
pub mod validation;

//! `SeaORM` entity definitions.

pub mod prelude;

pub mod activities;
pub mod activity_resources;
pub mod activity_workers;
pub mod branches;
pub mod performance;
pub mod resources;
pub mod schedules;
pub mod sea_orm_active_enums;
pub mod users;
pub mod workers;

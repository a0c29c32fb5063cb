//! Entity re-exports.

pub use super::activities::Entity as Activities;
pub use super::activity_resources::Entity as ActivityResources;
pub use super::activity_workers::Entity as ActivityWorkers;
pub use super::branches::Entity as Branches;
pub use super::performance::Entity as Performance;
pub use super::resources::Entity as Resources;
pub use super::schedules::Entity as Schedules;
pub use super::users::Entity as Users;
pub use super::workers::Entity as Workers;

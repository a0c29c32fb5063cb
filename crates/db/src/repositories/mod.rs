//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod activity;
pub mod branch;
pub mod dashboard;
pub mod error;
pub mod performance;
pub mod resource;
pub mod schedule;
pub mod user;
pub mod worker;

pub use activity::{ActivityFilter, ActivityInput, ActivityRepository};
pub use branch::{BranchRepository, BranchWithUserCount, UpdateBranchInput};
pub use dashboard::DashboardRepository;
pub use error::RepoError;
pub use performance::{PerformanceRepository, PerformanceWithDetails};
pub use resource::{AllocationInput, AllocationWithActivity, ResourceInput, ResourceRepository};
pub use schedule::{ScheduleRepository, ScheduleWithActivity};
pub use user::{CreateUserInput, UpdateUserInput, UserRepository, UserWithBranch};
pub use worker::{LaborLine, WorkerRepository};

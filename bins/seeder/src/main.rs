//! Seeds a development database with a small farm.
//!
//! Creates one branch, an admin and a staff account, a few resources and
//! workers, and a handful of activities spread around today so every
//! dashboard section has data. Running it twice is a no-op.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Days, Utc};
use farmstead_core::{
    auth::{UserRole, hash_password},
    domain::{ActivityType, PerformanceStatus, ResourceType},
    scheduling::plan_for_activity,
};
use farmstead_db::{
    ActivityInput, ActivityRepository, AllocationInput, BranchRepository, CreateUserInput,
    PerformanceRepository, ResourceInput, ResourceRepository, UserRepository, WorkerRepository,
};
use farmstead_shared::{
    AppConfig,
    types::{ActivityId, UserId, WorkerId},
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

// Development-only credentials.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "farmstead-admin";
const STAFF_USERNAME: &str = "ama";
const STAFF_PASSWORD: &str = "farmstead-staff";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    println!("Connecting to database...");
    let db = farmstead_db::connect(&config.database.url, 2, 1)
        .await
        .context("failed to connect to database")?;

    let users = UserRepository::new(db.clone());
    if users.find_by_username(ADMIN_USERNAME).await?.is_some() {
        println!("Database already seeded, skipping.");
        return Ok(());
    }

    println!("Seeding branch and users...");
    let branch = BranchRepository::new(db.clone())
        .create("Main Farm", "Kumasi")
        .await?;
    let branch_id = branch.id.into();

    users
        .create(CreateUserInput {
            username: ADMIN_USERNAME.to_string(),
            email: "admin@farmstead.local".to_string(),
            password_hash: hash_password(ADMIN_PASSWORD)?,
            branch_id,
            role: UserRole::Admin.into(),
            image: None,
        })
        .await?;
    let staff = users
        .create(CreateUserInput {
            username: STAFF_USERNAME.to_string(),
            email: "ama@farmstead.local".to_string(),
            password_hash: hash_password(STAFF_PASSWORD)?,
            branch_id,
            role: UserRole::Staff.into(),
            image: None,
        })
        .await?;

    let activity_ids = seed_activities(&db).await?;
    seed_resources(&db, activity_ids[1]).await?;
    seed_labor(&db, activity_ids[0]).await?;

    println!("Seeding assignments...");
    let performance = PerformanceRepository::new(db.clone());
    let staff_id = UserId::from_uuid(staff.id);
    performance
        .assign(staff_id, activity_ids[0], PerformanceStatus::Completed)
        .await?;
    performance
        .assign(staff_id, activity_ids[1], PerformanceStatus::InProgress)
        .await?;
    performance
        .assign(staff_id, activity_ids[3], PerformanceStatus::Assigned)
        .await?;

    println!("Seeding complete!");
    println!("  admin login: {ADMIN_USERNAME} / {ADMIN_PASSWORD}");
    println!("  staff login: {STAFF_USERNAME} / {STAFF_PASSWORD}");
    Ok(())
}

async fn seed_activities(db: &DatabaseConnection) -> anyhow::Result<Vec<ActivityId>> {
    println!("Seeding activities...");
    let today = Utc::now().date_naive();
    let days_ago = |n| today.checked_sub_days(Days::new(n)).unwrap_or(today);
    let days_ahead = |n| today.checked_add_days(Days::new(n)).unwrap_or(today);

    let samples = [
        ("Sold maize at market", ActivityType::Revenue, Decimal::new(125_000, 2), days_ago(10)),
        ("Bought layer feed", ActivityType::Expense, Decimal::new(42_050, 2), days_ago(7)),
        ("Vaccinated poultry", ActivityType::Neutral, Decimal::ZERO, days_ago(3)),
        ("Harvest cassava", ActivityType::Revenue, Decimal::new(90_000, 2), days_ahead(14)),
    ];

    let repo = ActivityRepository::new(db.clone());
    let mut ids = Vec::with_capacity(samples.len());
    for (description, activity_type, amount, activity_date) in samples {
        let plan = plan_for_activity(description, activity_date, None, today);
        let (activity, _) = repo
            .create(
                ActivityInput {
                    description: description.to_string(),
                    activity_type,
                    amount,
                    activity_date,
                },
                plan,
            )
            .await?;
        ids.push(ActivityId::from_uuid(activity.id));
    }
    Ok(ids)
}

async fn seed_resources(db: &DatabaseConnection, feed_activity: ActivityId) -> anyhow::Result<()> {
    println!("Seeding resources...");
    let repo = ResourceRepository::new(db.clone());
    repo.create(
        ResourceInput {
            name: "Layer feed".to_string(),
            quantity: 8,
            unit: Some("bags".to_string()),
            resource_type: ResourceType::Inventory,
            threshold: 10,
        },
        Some(AllocationInput {
            activity_id: feed_activity,
            allocated_quantity: 12,
        }),
    )
    .await?;
    repo.create(
        ResourceInput {
            name: "Tractor".to_string(),
            quantity: 1,
            unit: None,
            resource_type: ResourceType::Inventory,
            threshold: 0,
        },
        None,
    )
    .await?;
    Ok(())
}

async fn seed_labor(db: &DatabaseConnection, activity: ActivityId) -> anyhow::Result<()> {
    println!("Seeding workers...");
    let repo = WorkerRepository::new(db.clone());
    let worker = repo.create("Kofi Mensah", Decimal::new(1_250, 2)).await?;
    repo.add_labor(activity, WorkerId::from_uuid(worker.id), 6)
        .await?;
    Ok(())
}

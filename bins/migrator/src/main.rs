//! Farmstead schema migrations.
//!
//! Reads `DATABASE_URL` (a `.env` file is honoured) and accepts the standard
//! sea-orm-migration subcommands:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Revert the last migration
//!   migrator status  - List applied and pending migrations
//!   migrator fresh   - Drop everything and migrate from scratch

use farmstead_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}

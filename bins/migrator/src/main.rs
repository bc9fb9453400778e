//! Database migration runner.
//!
//! Reads `DATABASE_URL` and accepts the sea-orm-migration subcommands:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - List applied and pending migrations
//!   migrator fresh   - Drop every table, then apply all migrations

use sea_orm_migration::prelude::*;
use midyear_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}

//! # Status Command
//!
//! Reports where the database lives, whether it answers queries, how many
//! migrations are applied and how many garments it holds.

use crate::error::CliError;
use crate::output::{Outcome, StatusReport};
use threadcount_core::GarmentFilter;
use threadcount_db::Database;

pub async fn status(db: &Database) -> Result<Outcome, CliError> {
    let healthy = db.health_check().await;
    let migrations = db.migration_status().await?;
    let garments = db.garments().count(&GarmentFilter::all()).await?;

    Ok(Outcome::Status(StatusReport {
        database_path: db.path().to_path_buf(),
        healthy,
        migrations_applied: migrations.applied,
        migrations_total: migrations.total,
        garments,
    }))
}

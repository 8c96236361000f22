//! # Garment Commands
//!
//! Single-record and listing commands. Each is one repository call.

use tracing::{debug, info};

use crate::error::CliError;
use crate::output::Outcome;
use threadcount_core::{GarmentFilter, GarmentPatch, NewGarment};
use threadcount_db::Database;

pub async fn add(db: &Database, input: NewGarment) -> Result<Outcome, CliError> {
    let garment = db.garments().insert(&input).await?;

    info!(id = garment.id, "Garment added");
    Ok(Outcome::Garment(garment))
}

pub async fn get(db: &Database, id: i64) -> Result<Outcome, CliError> {
    let garment = db.garments().get(id).await?;
    Ok(Outcome::Garment(garment))
}

pub async fn list(db: &Database, filter: GarmentFilter) -> Result<Outcome, CliError> {
    debug!(?filter, "list command");

    let garments = db.garments().list(&filter).await?;
    Ok(Outcome::Garments(garments))
}

pub async fn update(db: &Database, id: i64, patch: GarmentPatch) -> Result<Outcome, CliError> {
    let garment = db.garments().update(id, &patch).await?;

    info!(id, "Garment updated");
    Ok(Outcome::Garment(garment))
}

pub async fn delete(db: &Database, id: i64) -> Result<Outcome, CliError> {
    db.garments().delete(id).await?;

    info!(id, "Garment deleted");
    Ok(Outcome::Deleted { id })
}

/// Restock with a positive delta, sell or write off with a negative one.
pub async fn adjust(db: &Database, id: i64, delta: i64) -> Result<Outcome, CliError> {
    let garment = db.garments().adjust_quantity(id, delta).await?;

    info!(id, delta, quantity = garment.quantity, "Quantity adjusted");
    Ok(Outcome::Garment(garment))
}

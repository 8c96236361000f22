//! # Import/Export Commands
//!
//! File handling around the store's CSV operations. A file that cannot be
//! opened is an `IO_ERROR`; a file that opens but cannot be parsed as CSV
//! is reported by the store.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::CliError;
use crate::output::Outcome;
use threadcount_core::GarmentFilter;
use threadcount_db::Database;

pub async fn import(db: &Database, path: &Path) -> Result<Outcome, CliError> {
    let file = File::open(path)
        .map_err(|e| CliError::io(format!("Cannot open {}: {}", path.display(), e)))?;

    info!(path = %path.display(), "Importing garments");

    let report = db.garments().import_csv(BufReader::new(file)).await?;
    Ok(Outcome::Imported(report))
}

pub async fn export(
    db: &Database,
    path: Option<&Path>,
    filter: GarmentFilter,
    out: &mut dyn Write,
) -> Result<Outcome, CliError> {
    let count = match path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| CliError::io(format!("Cannot create {}: {}", path.display(), e)))?;
            db.garments()
                .export_csv(BufWriter::new(file), &filter)
                .await?
        }
        None => db.garments().export_csv(&mut *out, &filter).await?,
    };

    Ok(Outcome::Exported {
        count,
        path: path.map(Path::to_path_buf),
    })
}

//! # CSV Import/Export
//!
//! Row-level parsing and writing for the `name,size,color,style,quantity`
//! layout. Database work lives in the repository; this module only turns
//! bytes into validated garments and garments back into bytes.
//!
//! ## Import Rules
//! ```text
//!   row                                   outcome
//!   ───                                   ───────
//!   name,size,color,style,quantity        header, ignored (first row only)
//!   ,M,Blue,T-Shirt,10                    accepted (no name)
//!   Polo,M,Blue                           skipped: wrong column count
//!   Polo,M,Blue,Shirt,ten                 skipped: quantity not a count
//!   Polo,,Blue,Shirt,3                    skipped: size is required
//!   (blank line)                          ignored
//! ```
//!
//! An unreadable stream (bad UTF-8, I/O failure) aborts the whole import.

use std::io::{Read, Write};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use tracing::debug;

use crate::error::{DbError, DbResult};
use threadcount_core::validation::parse_quantity;
use threadcount_core::{Garment, NewGarment, SkippedRow};

/// Column order shared by import and export.
pub const COLUMNS: [&str; 5] = ["name", "size", "color", "style", "quantity"];

/// Result of reading an import stream, before anything is written.
#[derive(Debug, Default)]
pub struct ParsedRows {
    /// Validated garments, in file order.
    pub rows: Vec<NewGarment>,
    /// Rows that were rejected, with the reason.
    pub skipped: Vec<SkippedRow>,
}

/// Reads every record and sorts it into accepted or skipped.
pub fn parse_rows<R: Read>(reader: R) -> DbResult<ParsedRows> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut parsed = ParsedRows::default();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);

        if index == 0 && is_header(&record) {
            debug!("Skipping CSV header row");
            continue;
        }

        if record.iter().all(str::is_empty) {
            continue;
        }

        match parse_record(&record) {
            Ok(garment) => parsed.rows.push(garment),
            Err(reason) => {
                debug!(line, %reason, "Skipping CSV row");
                parsed.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    Ok(parsed)
}

/// Writes a header and one row per garment.
pub fn write_rows<W: Write>(writer: W, garments: &[Garment]) -> DbResult<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record(COLUMNS)?;

    for garment in garments {
        let quantity = garment.quantity.to_string();
        writer.write_record([
            garment.name.as_deref().unwrap_or(""),
            garment.size.as_str(),
            garment.color.as_str(),
            garment.style.as_str(),
            quantity.as_str(),
        ])?;
    }

    writer.flush().map_err(|e| DbError::Csv(e.to_string()))?;
    Ok(())
}

fn is_header(record: &StringRecord) -> bool {
    record.len() == COLUMNS.len()
        && record
            .iter()
            .zip(COLUMNS)
            .all(|(field, column)| field.eq_ignore_ascii_case(column))
}

fn parse_record(record: &StringRecord) -> Result<NewGarment, String> {
    if record.len() != COLUMNS.len() {
        return Err(format!(
            "expected {} columns, found {}",
            COLUMNS.len(),
            record.len()
        ));
    }

    let field = |i: usize| record.get(i).unwrap_or_default();

    let quantity = parse_quantity(field(4)).map_err(|e| e.to_string())?;

    let mut garment = NewGarment::new(field(3), field(1), field(2)).quantity(quantity);
    if !field(0).is_empty() {
        garment = garment.name(field(0));
    }

    garment.validated().map_err(|e| e.to_string())
}

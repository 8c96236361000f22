//! # Output Rendering
//!
//! Turns command results into text for stdout: an aligned table, a detail
//! block, or JSON when `--json` is set.
//!
//! ```text
//! ID  STYLE    SIZE  COLOR  QTY  NAME
//! 1   T-Shirt  M     Blue    10
//! 2   Jeans    32    Indigo   4  Core
//! ```

use serde::Serialize;
use std::path::PathBuf;

use crate::error::CliError;
use threadcount_core::{Garment, ImportReport};

/// Store health, migration state and record count.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub database_path: PathBuf,
    pub healthy: bool,
    pub migrations_applied: usize,
    pub migrations_total: usize,
    pub garments: i64,
}

/// Result of one command, ready to render.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A single record (add, get, update, adjust).
    Garment(Garment),
    /// A list of records.
    Garments(Vec<Garment>),
    /// A record was removed.
    Deleted { id: i64 },
    /// CSV import finished.
    Imported(ImportReport),
    /// CSV export finished. `path` is `None` when the CSV went to stdout.
    Exported { count: usize, path: Option<PathBuf> },
    /// Store diagnostics.
    Status(StatusReport),
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
}

#[derive(Serialize)]
struct Exported<'a> {
    exported: usize,
    path: &'a PathBuf,
}

impl Outcome {
    /// Renders the outcome. An empty string means there is nothing to print.
    pub fn render(&self, json: bool) -> Result<String, CliError> {
        if json {
            return self.render_json();
        }

        let text = match self {
            Outcome::Garment(garment) => render_detail(garment),
            Outcome::Garments(garments) => render_table(garments),
            Outcome::Deleted { id } => format!("Deleted garment {}", id),
            Outcome::Imported(report) => render_import(report),
            Outcome::Exported { path: None, .. } => String::new(),
            Outcome::Exported {
                count,
                path: Some(path),
            } => format!("Exported {} garments to {}", count, path.display()),
            Outcome::Status(status) => render_status(status),
        };

        Ok(text)
    }

    fn render_json(&self) -> Result<String, CliError> {
        let text = match self {
            Outcome::Garment(garment) => serde_json::to_string_pretty(garment)?,
            Outcome::Garments(garments) => serde_json::to_string_pretty(garments)?,
            Outcome::Deleted { id } => serde_json::to_string_pretty(&Deleted { deleted: *id })?,
            Outcome::Imported(report) => serde_json::to_string_pretty(report)?,
            // stdout already carries the CSV
            Outcome::Exported { path: None, .. } => String::new(),
            Outcome::Exported {
                count,
                path: Some(path),
            } => serde_json::to_string_pretty(&Exported {
                exported: *count,
                path,
            })?,
            Outcome::Status(status) => serde_json::to_string_pretty(status)?,
        };

        Ok(text)
    }
}

/// Renders garments as an aligned table with a header row.
pub fn render_table(garments: &[Garment]) -> String {
    if garments.is_empty() {
        return "No garments found".to_string();
    }

    const HEADERS: [&str; 6] = ["ID", "STYLE", "SIZE", "COLOR", "QTY", "NAME"];

    let rows: Vec<[String; 6]> = garments
        .iter()
        .map(|g| {
            [
                g.id.to_string(),
                g.style.clone(),
                g.size.clone(),
                g.color.clone(),
                g.quantity.to_string(),
                g.name.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(&HEADERS.map(String::from), &widths));
    for row in &rows {
        lines.push(format_row(row, &widths));
    }

    lines.join("\n")
}

/// Numbers right-aligned, text left-aligned, trailing blanks trimmed.
fn format_row(cells: &[String; 6], widths: &[usize; 6]) -> String {
    let mut line = String::new();

    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let pad = width.saturating_sub(cell.chars().count());
        if i == 4 {
            line.push_str(&" ".repeat(pad));
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        }
    }

    line.trim_end().to_string()
}

fn render_detail(garment: &Garment) -> String {
    let mut lines = vec![
        format!("ID:       {}", garment.id),
        format!("Style:    {}", garment.style),
        format!("Size:     {}", garment.size),
        format!("Color:    {}", garment.color),
        format!("Quantity: {}", garment.quantity),
    ];
    if let Some(name) = &garment.name {
        lines.push(format!("Name:     {}", name));
    }
    lines.push(format!(
        "Updated:  {}",
        garment.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    lines.join("\n")
}

fn render_import(report: &ImportReport) -> String {
    let mut lines = vec![format!(
        "Imported {} garments, skipped {} rows",
        report.imported(),
        report.skipped.len()
    )];
    for row in &report.skipped {
        lines.push(format!("  line {}: {}", row.line, row.reason));
    }

    lines.join("\n")
}

fn render_status(status: &StatusReport) -> String {
    [
        format!("Database:   {}", status.database_path.display()),
        format!(
            "Health:     {}",
            if status.healthy { "ok" } else { "unreachable" }
        ),
        format!(
            "Migrations: {}/{}",
            status.migrations_applied, status.migrations_total
        ),
        format!("Garments:   {}", status.garments),
    ]
    .join("\n")
}

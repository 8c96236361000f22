//! # Garment Repository
//!
//! Database operations for garment records.
//!
//! ## Key Operations
//! - CRUD: `insert`, `get`, `list`, `update`, `delete`
//! - Stock changes: `adjust_quantity`
//! - Bulk: `import_csv`, `export_csv`
//!
//! ## Transaction Boundaries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation          Statements                     Atomicity            │
//! │  ─────────          ──────────                     ─────────            │
//! │  insert             INSERT                         single statement     │
//! │  get / list / count SELECT                         single statement     │
//! │  delete             DELETE                         single statement     │
//! │  update             SELECT → merge → UPDATE        BEGIN … COMMIT       │
//! │  adjust_quantity    SELECT → check → UPDATE        BEGIN … COMMIT       │
//! │  import_csv         parse all → INSERT × n         BEGIN … COMMIT       │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction, which rolls back.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write validates its input first; nothing invalid reaches SQL.

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::io::{Read, Write};
use tracing::{debug, info};

use crate::csv_io;
use crate::error::{DbError, DbResult};
use threadcount_core::validation::apply_quantity_delta;
use threadcount_core::{
    Garment, GarmentFilter, GarmentPatch, ImportReport, MatchMode, NewGarment, DEFAULT_QUANTITY,
};

const ENTITY: &str = "Garment";

const SELECT_GARMENT: &str = r#"
    SELECT id, name, style, size, color, quantity, created_at, updated_at
    FROM garments
"#;

/// Repository for garment database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.garments();
///
/// let shirt = repo.insert(&NewGarment::new("T-Shirt", "M", "Blue").quantity(10)).await?;
/// repo.update(shirt.id, &GarmentPatch::new().quantity(5)).await?;
/// let blue = repo.list(&GarmentFilter::all().color("Blue")).await?;
/// repo.delete(shirt.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct GarmentRepository {
    pool: SqlitePool,
}

impl GarmentRepository {
    /// Creates a new GarmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GarmentRepository { pool }
    }

    /// Adds a garment and returns it with its new id.
    ///
    /// ## Returns
    /// * `Ok(Garment)` - Stored record (trimmed, size normalised)
    /// * `Err(DbError::Validation)` - Missing field or negative quantity
    pub async fn insert(&self, input: &NewGarment) -> DbResult<Garment> {
        let valid = input.validated()?;

        debug!(style = %valid.style, size = %valid.size, color = %valid.color, "Inserting garment");

        let mut conn = self.pool.acquire().await?;
        let garment = insert_valid(&mut conn, &valid, now()).await?;

        debug!(id = garment.id, "Garment inserted");
        Ok(garment)
    }

    /// Gets a garment by id, or `None` if there is no such record.
    pub async fn find(&self, id: i64) -> DbResult<Option<Garment>> {
        let garment = sqlx::query_as::<_, Garment>(&format!("{SELECT_GARMENT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(garment)
    }

    /// Gets a garment by id.
    ///
    /// ## Returns
    /// * `Ok(Garment)` - Record found
    /// * `Err(DbError::NotFound)` - No garment with that id
    pub async fn get(&self, id: i64) -> DbResult<Garment> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Lists garments matching the filter, oldest first.
    ///
    /// ## Example
    /// ```rust,ignore
    /// // Everything
    /// let all = repo.list(&GarmentFilter::all()).await?;
    ///
    /// // Medium blue shirts
    /// let some = repo.list(&GarmentFilter::all().size("M").color("Blue")).await?;
    /// ```
    pub async fn list(&self, filter: &GarmentFilter) -> DbResult<Vec<Garment>> {
        let filter = filter.normalized();

        debug!(?filter, "Listing garments");

        let mut query = QueryBuilder::<Sqlite>::new(SELECT_GARMENT);
        push_filter(&mut query, &filter);
        query.push(" ORDER BY id");

        let garments = query
            .build_query_as::<Garment>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = garments.len(), "List returned garments");
        Ok(garments)
    }

    /// Counts garments matching the filter.
    pub async fn count(&self, filter: &GarmentFilter) -> DbResult<i64> {
        let filter = filter.normalized();

        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM garments");
        push_filter(&mut query, &filter);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Overwrites the fields present in `patch` and returns the new record.
    ///
    /// The patch is validated before the id is looked up, so a bad patch is
    /// reported as a validation error even for a missing id. An empty patch
    /// changes nothing (not even `updated_at`).
    ///
    /// ## Returns
    /// * `Ok(Garment)` - Updated record
    /// * `Err(DbError::Validation)` - A supplied field is invalid
    /// * `Err(DbError::NotFound)` - No garment with that id
    pub async fn update(&self, id: i64, patch: &GarmentPatch) -> DbResult<Garment> {
        let patch = patch.validated()?;

        debug!(id, ?patch, "Updating garment");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let current = fetch_in(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        if patch.is_empty() {
            return Ok(current);
        }

        let mut next = current.apply(&patch);
        next.updated_at = now();

        write_in(&mut tx, &next).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(next)
    }

    /// Adds a signed delta to the quantity on hand.
    ///
    /// ## Arguments
    /// * `id` - Garment id
    /// * `delta` - Positive to restock, negative to take out of stock
    ///
    /// ## Returns
    /// * `Ok(Garment)` - Record with the new quantity
    /// * `Err(DbError::Rule)` - The result would be negative
    /// * `Err(DbError::NotFound)` - No garment with that id
    pub async fn adjust_quantity(&self, id: i64, delta: i64) -> DbResult<Garment> {
        debug!(id, delta, "Adjusting quantity");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut garment = fetch_in(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        garment.quantity = apply_quantity_delta(garment.quantity, delta)?;
        garment.updated_at = now();

        write_in(&mut tx, &garment).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(garment)
    }

    /// Removes a garment permanently.
    ///
    /// Deleting the same id twice fails the second time with `NotFound`.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting garment");

        let result = sqlx::query("DELETE FROM garments WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }

    /// Loads `name,size,color,style,quantity` rows from CSV.
    ///
    /// Bad rows are skipped and listed in the report. Good rows are inserted
    /// in one transaction: either all of them land or none do.
    pub async fn import_csv<R: Read>(&self, reader: R) -> DbResult<ImportReport> {
        let parsed = csv_io::parse_rows(reader)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let stamp = now();
        let mut report = ImportReport {
            imported_ids: Vec::with_capacity(parsed.rows.len()),
            skipped: parsed.skipped,
        };

        for row in &parsed.rows {
            let garment = insert_valid(&mut tx, row, stamp).await?;
            report.imported_ids.push(garment.id);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            imported = report.imported(),
            skipped = report.skipped.len(),
            "CSV import complete"
        );

        Ok(report)
    }

    /// Writes matching garments as CSV, with a header row.
    ///
    /// Returns the number of records written.
    pub async fn export_csv<W: Write>(&self, writer: W, filter: &GarmentFilter) -> DbResult<usize> {
        let garments = self.list(filter).await?;
        csv_io::write_rows(writer, &garments)?;

        info!(count = garments.len(), "CSV export complete");
        Ok(garments.len())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Timestamps are kept at millisecond precision so they survive the text
/// round trip through SQLite unchanged.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Inserts an already validated garment.
async fn insert_valid(
    conn: &mut SqliteConnection,
    valid: &NewGarment,
    stamp: DateTime<Utc>,
) -> DbResult<Garment> {
    let quantity = valid.quantity.unwrap_or(DEFAULT_QUANTITY);

    let result = sqlx::query(
        r#"
        INSERT INTO garments (name, style, size, color, quantity, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&valid.name)
    .bind(&valid.style)
    .bind(&valid.size)
    .bind(&valid.color)
    .bind(quantity)
    .bind(stamp)
    .bind(stamp)
    .execute(&mut *conn)
    .await?;

    Ok(Garment {
        id: result.last_insert_rowid(),
        name: valid.name.clone(),
        style: valid.style.clone(),
        size: valid.size.clone(),
        color: valid.color.clone(),
        quantity,
        created_at: stamp,
        updated_at: stamp,
    })
}

async fn fetch_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Garment>> {
    let garment = sqlx::query_as::<_, Garment>(&format!("{SELECT_GARMENT} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(garment)
}

/// Writes every mutable column of `garment` back to its row.
async fn write_in(conn: &mut SqliteConnection, garment: &Garment) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE garments SET
            name = ?2,
            style = ?3,
            size = ?4,
            color = ?5,
            quantity = ?6,
            updated_at = ?7
        WHERE id = ?1
        "#,
    )
    .bind(garment.id)
    .bind(&garment.name)
    .bind(&garment.style)
    .bind(&garment.size)
    .bind(&garment.color)
    .bind(garment.quantity)
    .bind(garment.updated_at)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found(ENTITY, garment.id));
    }

    Ok(())
}

/// Appends `WHERE …` for a normalised filter.
///
/// `Contains` uses `instr(lower(..))` rather than `LIKE` so `%` and `_` in
/// user input are matched literally. A NULL name never matches.
fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &GarmentFilter) {
    let criteria = [
        ("style", &filter.style),
        ("size", &filter.size),
        ("color", &filter.color),
        ("name", &filter.name),
    ];

    let mut first = true;
    for (column, value) in criteria {
        let Some(value) = value else { continue };

        query.push(if first { " WHERE " } else { " AND " });
        first = false;

        match filter.match_mode {
            MatchMode::Exact => {
                query.push(column).push(" = ").push_bind(value.clone());
            }
            MatchMode::Contains => {
                query
                    .push("instr(lower(")
                    .push(column)
                    .push("), lower(")
                    .push_bind(value.clone())
                    .push(")) > 0");
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

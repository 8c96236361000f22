//! # Database Migrations
//!
//! Embedded SQL migrations for the inventory file.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  Database::new()                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Rebuild a pre-migration garments table, if one is found               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (create if missing)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs applied                                │
//! │       │                                                                 │
//! │       └── 001_create_garments.sql  ✓ / ⬜                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Run pending migrations in order, record each in _sqlx_migrations      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Verify the garments columns, fail with MigrationFailed otherwise      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. **NEVER** modify existing migrations - always add new ones
//!
//! ## Legacy Files
//!
//! Files written before migrations existed hold a `garments` table with
//! `name NOT NULL`, no timestamps and sometimes no `quantity` column.
//! `CREATE TABLE IF NOT EXISTS` would leave such a table untouched, so it is
//! rebuilt first: every row is validated like a fresh insert and copied with
//! its id. A row that fails validation aborts the upgrade and the file is
//! left as it was.

use chrono::{SubsecRound, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use threadcount_core::NewGarment;

/// Schema of the first migration, reused to rebuild legacy tables.
const CREATE_GARMENTS: &str = include_str!("../../../migrations/sqlite/001_create_garments.sql");

/// Columns the repository reads and writes.
const GARMENT_COLUMNS: [&str; 8] = [
    "id",
    "name",
    "style",
    "size",
    "color",
    "quantity",
    "created_at",
    "updated_at",
];

/// Row shape of a legacy table, with every value read back as text or integer.
type LegacyRow = (
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<i64>,
);

/// Embedded migrations from the workspace `migrations/sqlite` directory.
///
/// The `sqlx::migrate!()` macro embeds the SQL files into the binary at
/// compile time. No runtime file access needed.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Embedded vs applied migration counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub total: usize,
    pub applied: usize,
}

impl MigrationStatus {
    /// True when nothing is pending.
    pub fn is_current(&self) -> bool {
        self.applied >= self.total
    }
}

/// Runs all pending database migrations.
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Transactional: each migration runs in a transaction
/// - Ordered: migrations run in filename order (001, 002, ...)
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    upgrade_legacy_table(pool).await?;
    MIGRATOR.run(pool).await?;
    verify_schema(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

async fn garment_columns(pool: &SqlitePool) -> DbResult<Vec<String>> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('garments')")
        .fetch_all(pool)
        .await?;

    Ok(columns)
}

/// Fails unless the garments table has every column the repository uses.
async fn verify_schema(pool: &SqlitePool) -> DbResult<()> {
    let columns = garment_columns(pool).await?;

    let missing: Vec<&str> = GARMENT_COLUMNS
        .iter()
        .copied()
        .filter(|wanted| !columns.iter().any(|c| c == wanted))
        .collect();

    if !missing.is_empty() {
        return Err(DbError::MigrationFailed(format!(
            "garments table is missing columns: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Rebuilds a garments table that predates the timestamp columns.
///
/// Does nothing for a new file or one that is already current.
async fn upgrade_legacy_table(pool: &SqlitePool) -> DbResult<()> {
    let columns = garment_columns(pool).await?;
    if columns.is_empty() || columns.iter().any(|c| c == "created_at") {
        return Ok(());
    }

    let has_quantity = columns.iter().any(|c| c == "quantity");
    warn!(has_quantity, "Legacy garments table found, rebuilding");

    let mut tx = pool.begin().await?;

    let copied = rebuild_legacy(&mut tx, has_quantity)
        .await
        .map_err(|e| match e {
            DbError::MigrationFailed(_) => e,
            other => DbError::MigrationFailed(format!(
                "legacy garments table could not be upgraded: {}",
                other
            )),
        })?;

    tx.commit()
        .await
        .map_err(|e| DbError::MigrationFailed(e.to_string()))?;

    info!(rows = copied, "Legacy garments table upgraded");
    Ok(())
}

async fn rebuild_legacy(conn: &mut SqliteConnection, has_quantity: bool) -> DbResult<usize> {
    sqlx::query("ALTER TABLE garments RENAME TO garments_legacy")
        .execute(&mut *conn)
        .await?;
    sqlx::raw_sql(CREATE_GARMENTS).execute(&mut *conn).await?;

    let quantity = if has_quantity {
        "CAST(quantity AS INTEGER)"
    } else {
        "NULL"
    };
    let rows: Vec<LegacyRow> = sqlx::query_as(&format!(
        "SELECT id, CAST(name AS TEXT), CAST(style AS TEXT), CAST(size AS TEXT), \
         CAST(color AS TEXT), {quantity} FROM garments_legacy ORDER BY id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    let stamp = Utc::now().trunc_subsecs(3);

    for (id, name, style, size, color, quantity) in &rows {
        let row = NewGarment {
            style: style.clone().unwrap_or_default(),
            size: size.clone().unwrap_or_default(),
            color: color.clone().unwrap_or_default(),
            quantity: *quantity,
            name: name.clone(),
        };
        let valid = row.validated().map_err(|e| {
            DbError::MigrationFailed(format!("legacy garment {} is invalid: {}", id, e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO garments (id, name, style, size, color, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(id)
        .bind(&valid.name)
        .bind(&valid.style)
        .bind(&valid.size)
        .bind(&valid.color)
        .bind(valid.quantity.unwrap_or_default())
        .bind(stamp)
        .bind(stamp)
        .execute(&mut *conn)
        .await?;
    }

    // Ids deleted before the upgrade stay retired.
    let sequence: Option<i64> =
        sqlx::query_scalar("SELECT seq FROM sqlite_sequence WHERE name = 'garments_legacy'")
            .fetch_optional(&mut *conn)
            .await?;
    if let Some(seq) = sequence {
        let updated =
            sqlx::query("UPDATE sqlite_sequence SET seq = max(seq, ?1) WHERE name = 'garments'")
                .bind(seq)
                .execute(&mut *conn)
                .await?;
        if updated.rows_affected() == 0 {
            sqlx::query("INSERT INTO sqlite_sequence (name, seq) VALUES ('garments', ?1)")
                .bind(seq)
                .execute(&mut *conn)
                .await?;
        }
    }

    sqlx::query("DROP TABLE garments_legacy")
        .execute(&mut *conn)
        .await?;

    Ok(rows.len())
}

/// Returns information about migrations, for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok(MigrationStatus {
        total,
        applied: applied as usize,
    })
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_migrations_applied_on_open() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let status = db.migration_status().await.unwrap();

        assert_eq!(status.total, 1);
        assert!(status.is_current());
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.run_migrations().await.unwrap();

        assert_eq!(db.migration_status().await.unwrap().applied, 1);
    }
}

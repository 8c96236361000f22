//! # Database Handle
//!
//! Opening, configuring and closing the inventory file.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Inventory Store Lifecycle                          │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure file + pragmas                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                           │
//! │       ├── create file if missing                                       │
//! │       ├── open ONE connection (exclusive lock, WAL)                    │
//! │       └── run migrations (ensure schema)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.garments().insert(..) / get / list / update / delete               │
//! │  (every call is its own transaction, serialized on the connection)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.close().await ← checkpoint + release the file lock                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handle is created once and passed by reference to whoever needs it.
//! There is no global connection.

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqliteLockingMode, SqlitePoolOptions,
    SqliteSynchronous,
};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::garment::GarmentRepository;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/garments.db")
///     .busy_timeout(Duration::from_secs(2))
///     .exclusive(false);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 1 (one user, one connection, calls serialized)
    pub max_connections: u32,

    /// How long to wait for the connection before giving up.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// How long SQLite retries when the file is locked.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Hold an exclusive lock on the file for the lifetime of the handle.
    /// Default: true
    pub exclusive: bool,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            exclusive: true,
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the SQLite busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether the file is locked exclusively.
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1, // In-memory requires single connection
            connect_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(1),
            exclusive: false,
            run_migrations: true,
        }
    }

    /// True when this configuration points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
                .journal_mode(SqliteJournalMode::Memory)
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                // Create file if it doesn't exist
                .create_if_missing(true)
                // WAL: a crash mid-write never corrupts committed rows
                .journal_mode(SqliteJournalMode::Wal)
        };

        let options = options
            // NORMAL synchronous: data is safe from corruption,
            // may lose the last transaction on power loss
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout);

        if self.exclusive {
            Ok(options.locking_mode(SqliteLockingMode::Exclusive))
        } else {
            Ok(options)
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("garments.db")).await?;
///
/// let id = db.garments().insert(&NewGarment::new("T-Shirt", "M", "Blue")).await?.id;
/// let shirt = db.garments().get(id).await?;
///
/// db.close().await;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool (capped at one connection by default).
    pool: SqlitePool,

    /// Where the data lives, for diagnostics.
    path: PathBuf,
}

impl Database {
    /// Opens (or creates) the database and ensures the schema.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite (WAL, NORMAL synchronous, exclusive lock)
    /// 3. Opens the connection eagerly, so a bad path fails here
    /// 4. Runs migrations (if enabled), upgrading a legacy table first
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Connection or migration failed (fatal at startup)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            exclusive = config.exclusive,
            "Opening inventory database"
        );

        let connect_options = config.connect_options()?;

        debug!("Connection options configured");

        // Connections are kept for the life of the handle: an in-memory
        // database vanishes with its last connection, and the exclusive
        // lock should not be dropped and re-taken behind our back.
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            path: config.database_path.clone(),
        };

        if config.run_migrations {
            if let Err(e) = db.run_migrations().await {
                db.close().await;
                return Err(e);
            }
        }

        Ok(db)
    }

    /// Opens a file-backed database with default settings.
    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        Database::new(DbConfig::new(path)).await
    }

    /// Runs database migrations.
    ///
    /// Idempotent: safe to run multiple times.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Embedded vs applied migration counts.
    pub async fn migration_status(&self) -> DbResult<MigrationStatus> {
        migrations::migration_status(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// Prefer repository methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Path the database was opened from (`:memory:` for in-memory).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the garment repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let blue = db.garments().list(&GarmentFilter::all().color("Blue")).await?;
    /// ```
    pub fn garments(&self) -> GarmentRepository {
        GarmentRepository::new(self.pool.clone())
    }

    /// Closes the database.
    ///
    /// Waits for the connection to finish, which checkpoints the WAL and
    /// releases the file lock. After this every repository call fails with a
    /// storage error.
    pub async fn close(&self) {
        info!(path = %self.path.display(), "Closing inventory database");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Database Error Types
//!
//! Error types for inventory store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (threadcount-core)    sqlx::Error / csv::Error         │
//! │       │                                      │                          │
//! │       ▼                                      ▼                          │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├── ErrorKind::Validation  (bad input, nothing written)          │
//! │       ├── ErrorKind::NotFound    (no garment with that id)             │
//! │       └── ErrorKind::Storage     (file/database failure)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in app) ← message + exit code                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use threadcount_core::{CoreError, ValidationError};

/// The three failure categories the presentation layer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid input fields.
    Validation,
    /// The operation referenced a nonexistent id.
    NotFound,
    /// Underlying file/database access failed.
    Storage,
}

/// Inventory store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Input failed field validation. Nothing was written.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A domain rule rejected the operation (e.g. stock would go negative).
    #[error("{0}")]
    Rule(CoreError),

    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `get`, `update`, `delete` or `adjust` with an id that never existed
    /// - The garment was deleted earlier (deletion is final)
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A table constraint rejected the row.
    ///
    /// Validation runs first, so this signals a bug or a hand-edited file.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created (missing directory, permissions)
    /// - File is locked by another process
    /// - File is not a SQLite database
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// CSV stream could not be read or written.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::Validation(_) | DbError::Rule(_) | DbError::ConstraintViolation(_) => {
                ErrorKind::Validation
            }
            DbError::NotFound { .. } => ErrorKind::NotFound,
            DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed(_)
            | DbError::TransactionFailed(_)
            | DbError::Csv(_)
            | DbError::Internal(_) => ErrorKind::Storage,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_storage(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }
}

/// Field errors stay field errors; other rule failures keep their own variant.
impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => DbError::Validation(v),
            other => DbError::Rule(other),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → CHECK/NOT NULL → ConstraintViolation,
///                               locked/busy    → ConnectionFailed,
///                               otherwise      → QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("CHECK constraint failed")
                    || msg.contains("NOT NULL constraint failed")
                {
                    DbError::ConstraintViolation(msg.to_string())
                } else if msg.contains("database is locked") || msg.contains("database is busy") {
                    DbError::ConnectionFailed(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => {
                DbError::ConnectionFailed("Timed out waiting for the database".to_string())
            }

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<csv::Error> for DbError {
    fn from(err: csv::Error) -> Self {
        DbError::Csv(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let err = DbError::from(ValidationError::Required {
            field: "style".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "style is required");

        assert!(DbError::not_found("Garment", 7).is_not_found());
        assert_eq!(
            DbError::not_found("Garment", 7).to_string(),
            "Garment not found: 7"
        );
        assert!(DbError::ConnectionFailed("locked".to_string()).is_storage());
        assert!(DbError::Csv("bad quote".to_string()).is_storage());
    }

    #[test]
    fn test_core_error_mapping() {
        let err: DbError = CoreError::Validation(ValidationError::Negative {
            field: "quantity".to_string(),
        })
        .into();
        assert!(matches!(err, DbError::Validation(_)));

        let err: DbError = CoreError::InsufficientQuantity {
            available: 1,
            requested: 2,
        }
        .into();
        assert!(matches!(err, DbError::Rule(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn test_row_not_found_mapping() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());

        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(err.is_storage());
    }
}

//! # CLI Error Type
//!
//! Unified error type for commands, carrying a machine-readable code and a
//! message fit for the user.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Threadcount                            │
//! │                                                                         │
//! │  threadcount update 7 --quantity -1                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<Outcome, CliError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  DbError::Validation ──────────► VALIDATION_ERROR  (exit 6)      │  │
//! │  │  DbError::NotFound ────────────► NOT_FOUND         (exit 3)      │  │
//! │  │  DbError::{Connection,Query..} ─► STORAGE_ERROR    (exit 4)      │  │
//! │  │  std::io::Error ───────────────► IO_ERROR          (exit 5)      │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr:  error: quantity must be a non-negative integer                │
//! │  --json:  {"code":"VALIDATION_ERROR","message":"quantity must be ..."}  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage details are logged with `tracing::error!`; the user sees a short
//! generic message.
//!
//! Exit status 2 belongs to clap, which uses it for malformed command lines.

use serde::Serialize;
use threadcount_db::DbError;

/// Error returned from CLI commands.
///
/// ## Serialization
/// This is what `--json` prints on stderr when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Garment not found: 7"
/// }
/// ```
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes, one per failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// No garment with the given id
    NotFound,

    /// Database operation failed
    StorageError,

    /// Reading or writing a file failed
    IoError,
}

impl ErrorCode {
    /// Process exit status for this code.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::ValidationError => 6,
            ErrorCode::NotFound => 3,
            ErrorCode::StorageError => 4,
            ErrorCode::IoError => 5,
        }
    }
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::StorageError, message)
    }

    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::IoError, message)
    }
}

/// Converts store errors to CLI errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Validation(e) => CliError::validation(e.to_string()),
            DbError::Rule(e) => CliError::validation(e.to_string()),
            DbError::NotFound { entity, id } => {
                CliError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::ConstraintViolation(e) => {
                tracing::error!("Constraint violation: {}", e);
                CliError::validation("The database rejected the record")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                CliError::storage("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                CliError::storage("Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                CliError::storage("Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                CliError::storage("Database transaction failed")
            }
            DbError::Csv(e) => CliError::storage(format!("Could not read CSV: {}", e)),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                CliError::storage("Database operation failed")
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::io(format!("Could not encode JSON: {}", err))
    }
}

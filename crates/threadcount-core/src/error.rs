//! # Error Types
//!
//! Domain-specific error types for threadcount-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  threadcount-core errors (this file)                                   │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  threadcount-db errors (separate crate)                                │
//! │  └── DbError          - NotFound + storage failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the user sees (message + exit code)       │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → CliError → terminal                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in every message
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations that are not tied to a single input field.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Applying a stock adjustment would leave a negative count.
    ///
    /// ## When This Occurs
    /// ```text
    /// quantity on hand: 3
    /// adjust by: -5
    ///      │
    ///      ▼
    /// InsufficientQuantity { available: 3, requested: 5 }
    /// ```
    #[error("Insufficient quantity: available {available}, requested {requested}")]
    InsufficientQuantity { available: i64, requested: i64 },

    /// Arithmetic on a quantity overflowed `i64`.
    #[error("Quantity overflow")]
    QuantityOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the store boundary before anything touches the database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must be a non-negative integer")]
    Negative { field: String },

    /// Size is neither a known letter size nor a positive number.
    #[error("size '{value}' is not a letter size ({allowed}) or a positive number")]
    InvalidSize { value: String, allowed: String },

    /// Invalid format (e.g., quantity that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the field this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. } => field,
            ValidationError::InvalidSize { .. } => "size",
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientQuantity {
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient quantity: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "style".to_string(),
        };
        assert_eq!(err.to_string(), "style is required");

        let err = ValidationError::Negative {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be a non-negative integer");
    }

    #[test]
    fn test_validation_error_field() {
        let err = ValidationError::TooLong {
            field: "color".to_string(),
            max: 50,
        };
        assert_eq!(err.field(), "color");

        let err = ValidationError::InvalidSize {
            value: "huge".to_string(),
            allowed: "S, M".to_string(),
        };
        assert_eq!(err.field(), "size");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "color".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

//! # Validation Module
//!
//! Input validation for garment records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (CLI)                                           │
//! │  └── Type parsing only (clap turns "abc" for an i64 into an error)     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store boundary (GarmentRepository)                           │
//! │  └── THIS MODULE: required fields, lengths, sizes, quantity >= 0       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (quantity >= 0)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators return the normalised value (trimmed text, canonical size)
//! so the store persists exactly what was checked.
//!
//! ## Usage
//! ```rust
//! use threadcount_core::validation::{validate_style, validate_quantity};
//!
//! assert_eq!(validate_style("  T-Shirt ").unwrap(), "T-Shirt");
//! assert!(validate_quantity(-1).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::size::Size;
use crate::types::{GarmentPatch, NewGarment};
use crate::{DEFAULT_QUANTITY, MAX_COLOR_LEN, MAX_NAME_LEN, MAX_STYLE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a style label.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
pub fn validate_style(style: &str) -> ValidationResult<String> {
    required_text("style", style, MAX_STYLE_LEN)
}

/// Validates a color label.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 50 characters
pub fn validate_color(color: &str) -> ValidationResult<String> {
    required_text("color", color, MAX_COLOR_LEN)
}

/// Validates a size and returns its canonical form.
///
/// ## Example
/// ```rust
/// use threadcount_core::validation::validate_size;
///
/// assert_eq!(validate_size("xl").unwrap(), "XL");
/// assert_eq!(validate_size("32").unwrap(), "32");
/// assert!(validate_size("").is_err());
/// ```
pub fn validate_size(size: &str) -> ValidationResult<String> {
    Size::parse(size).map(|s| s.as_str().to_string())
}

/// Validates an optional display name.
///
/// Blank names become `None`.
pub fn validate_name(name: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(Some(name.to_string()))
}

/// Validates a quantity.
///
/// ## Rules
/// - Must be >= 0 (zero means "tracked but out of stock")
pub fn validate_quantity(quantity: i64) -> ValidationResult<i64> {
    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(quantity)
}

/// Parses a quantity typed as text (CSV cells, form fields).
///
/// Only plain digits are accepted, so "-3", "+3" and "3.0" are all rejected.
pub fn parse_quantity(text: &str) -> ValidationResult<i64> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    if text.starts_with('-') {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: format!("'{}' is not a whole number", text),
        });
    }

    text.parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: format!("'{}' is too large", text),
        })
}

/// Applies a signed stock change to a quantity on hand.
///
/// ## Rules
/// ```text
/// on hand 10, delta -3  → 7
/// on hand 10, delta +5  → 15
/// on hand  3, delta -5  → InsufficientQuantity { available: 3, requested: 5 }
/// ```
pub fn apply_quantity_delta(on_hand: i64, delta: i64) -> CoreResult<i64> {
    let next = on_hand.checked_add(delta).ok_or(CoreError::QuantityOverflow)?;

    if next < 0 {
        return Err(CoreError::InsufficientQuantity {
            available: on_hand,
            requested: delta.unsigned_abs().min(i64::MAX as u64) as i64,
        });
    }

    Ok(next)
}

// =============================================================================
// Record Validators
// =============================================================================

impl NewGarment {
    /// Validates every field and returns the normalised input.
    ///
    /// The returned value always has `quantity` set (defaulting to zero).
    ///
    /// ## Example
    /// ```rust
    /// use threadcount_core::NewGarment;
    ///
    /// let valid = NewGarment::new(" T-Shirt ", "m", "Blue").validated().unwrap();
    /// assert_eq!(valid.style, "T-Shirt");
    /// assert_eq!(valid.size, "M");
    /// assert_eq!(valid.quantity, Some(0));
    ///
    /// assert!(NewGarment::new("", "M", "Blue").validated().is_err());
    /// ```
    pub fn validated(&self) -> ValidationResult<NewGarment> {
        Ok(NewGarment {
            style: validate_style(&self.style)?,
            size: validate_size(&self.size)?,
            color: validate_color(&self.color)?,
            quantity: Some(validate_quantity(self.quantity.unwrap_or(DEFAULT_QUANTITY))?),
            name: validate_name(self.name.as_deref())?,
        })
    }
}

impl GarmentPatch {
    /// Validates the fields that are present and returns the normalised patch.
    ///
    /// A present but blank `name` is kept as `Some("")`, meaning "clear it".
    pub fn validated(&self) -> ValidationResult<GarmentPatch> {
        Ok(GarmentPatch {
            style: self.style.as_deref().map(validate_style).transpose()?,
            size: self.size.as_deref().map(validate_size).transpose()?,
            color: self.color.as_deref().map(validate_color).transpose()?,
            quantity: self.quantity.map(validate_quantity).transpose()?,
            name: match self.name.as_deref() {
                None => None,
                Some(name) => Some(validate_name(Some(name))?.unwrap_or_default()),
            },
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Garment Sizes
//!
//! A size is either a label from a bounded letter set or a positive number.
//!
//! ## Accepted Inputs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input          Parsed as                 Stored as                     │
//! │  ─────          ─────────                 ─────────                     │
//! │  "m", " M "     Letter(M)                 "M"                           │
//! │  "xl"           Letter(XL)                "XL"                          │
//! │  "2xl"          Letter(XXL)               "XXL"                         │
//! │  "one size"     Letter(OS)                "OS"                          │
//! │  "32"           Numeric("32")             "32"                          │
//! │  "10.5"         Numeric("10.5")           "10.5"                        │
//! │  "huge", "-2"   ✗ ValidationError::InvalidSize                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Normalising on the way in means `list --size m` and `list --size M`
//! find the same rows.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Longest size label accepted.
pub const MAX_SIZE_LEN: usize = 20;

// =============================================================================
// Letter Sizes
// =============================================================================

/// Letter sizes, smallest to largest, with `OS` (one size) last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LetterSize {
    Xxs,
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
    Xxxl,
    /// One size fits all.
    Os,
}

impl LetterSize {
    /// Every letter size in display order.
    pub const ALL: [LetterSize; 9] = [
        LetterSize::Xxs,
        LetterSize::Xs,
        LetterSize::S,
        LetterSize::M,
        LetterSize::L,
        LetterSize::Xl,
        LetterSize::Xxl,
        LetterSize::Xxxl,
        LetterSize::Os,
    ];

    /// Canonical upper-case label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LetterSize::Xxs => "XXS",
            LetterSize::Xs => "XS",
            LetterSize::S => "S",
            LetterSize::M => "M",
            LetterSize::L => "L",
            LetterSize::Xl => "XL",
            LetterSize::Xxl => "XXL",
            LetterSize::Xxxl => "XXXL",
            LetterSize::Os => "OS",
        }
    }

    /// Comma-separated list of canonical labels, for error messages.
    pub fn allowed_labels() -> String {
        LetterSize::ALL
            .iter()
            .map(LetterSize::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for LetterSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let size = match upper.as_str() {
            "XXS" | "2XS" => LetterSize::Xxs,
            "XS" => LetterSize::Xs,
            "S" => LetterSize::S,
            "M" => LetterSize::M,
            "L" => LetterSize::L,
            "XL" => LetterSize::Xl,
            "XXL" | "2XL" => LetterSize::Xxl,
            "XXXL" | "3XL" => LetterSize::Xxxl,
            "OS" | "ONE SIZE" | "ONESIZE" => LetterSize::Os,
            _ => return Err(()),
        };
        Ok(size)
    }
}

// =============================================================================
// Size
// =============================================================================

/// A validated garment size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Size {
    /// Label from the bounded letter set.
    Letter(LetterSize),
    /// Positive numeric size (waist, shoe, dress sizes), in canonical
    /// decimal form: no leading zeros, no trailing fractional zeros.
    Numeric(String),
}

impl Size {
    /// Parses and normalises user input.
    ///
    /// ## Example
    /// ```rust
    /// use threadcount_core::size::{LetterSize, Size};
    ///
    /// assert_eq!(Size::parse(" xl ").unwrap(), Size::Letter(LetterSize::Xl));
    /// assert_eq!(Size::parse("32").unwrap().as_str(), "32");
    /// assert_eq!(Size::parse("010.50").unwrap().as_str(), "10.5");
    /// assert!(Size::parse("enormous").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Size, ValidationError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "size".to_string(),
            });
        }

        if trimmed.len() > MAX_SIZE_LEN {
            return Err(ValidationError::TooLong {
                field: "size".to_string(),
                max: MAX_SIZE_LEN,
            });
        }

        if let Ok(letter) = trimmed.parse::<LetterSize>() {
            return Ok(Size::Letter(letter));
        }

        if is_positive_number(trimmed) {
            return Ok(Size::Numeric(canonical_number(trimmed)));
        }

        Err(ValidationError::InvalidSize {
            value: trimmed.to_string(),
            allowed: LetterSize::allowed_labels(),
        })
    }

    /// Canonical text stored in the database.
    pub fn as_str(&self) -> &str {
        match self {
            Size::Letter(letter) => letter.as_str(),
            Size::Numeric(value) => value,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Size {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::parse(s)
    }
}

/// Digits with at most one decimal point, and greater than zero.
fn is_positive_number(s: &str) -> bool {
    let digits_and_dot = s.chars().all(|c| c.is_ascii_digit() || c == '.');
    let one_dot_at_most = s.matches('.').count() <= 1;
    let has_digit = s.chars().any(|c| c.is_ascii_digit());

    if !(digits_and_dot && one_dot_at_most && has_digit) {
        return false;
    }

    s.parse::<f64>().map(|v| v > 0.0).unwrap_or(false)
}

/// Rewrites a positive decimal so equal values share one spelling.
///
/// ```text
/// "010"  → "10"      "10.0" → "10"      "10." → "10"
/// ".5"   → "0.5"     "8.50" → "8.5"
/// ```
fn canonical_number(s: &str) -> String {
    let (int, frac) = s.split_once('.').unwrap_or((s, ""));

    let int = match int.trim_start_matches('0') {
        "" => "0",
        rest => rest,
    };
    let frac = frac.trim_end_matches('0');

    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{}.{}", int, frac)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

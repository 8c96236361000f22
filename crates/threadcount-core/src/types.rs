//! # Domain Types
//!
//! Core domain types used throughout Threadcount.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Garment      │   │   NewGarment    │   │  GarmentPatch   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (store)     │   │  style          │   │  style?         │       │
//! │  │  style, size    │   │  size, color    │   │  size?, color?  │       │
//! │  │  color, qty     │   │  quantity?      │   │  quantity?      │       │
//! │  │  name?          │   │  name?          │   │  name?          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │         ▲ persisted          add input            update input          │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │ GarmentFilter   │   │  ImportReport   │                             │
//! │  │  list/count     │   │  CSV bulk load  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input structs replace loosely-typed form dictionaries: the presentation
//! layer fills them in, the store validates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::size::Size;

// =============================================================================
// Garment
// =============================================================================

/// A garment record as persisted by the inventory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Garment {
    /// Store-assigned identifier. Immutable, never reused after deletion.
    pub id: i64,

    /// Optional display name.
    pub name: Option<String>,

    /// Style label, e.g. "T-Shirt".
    pub style: String,

    /// Canonical size label ("M", "XXL", "32").
    pub size: String,

    /// Color label.
    pub color: String,

    /// Units on hand. Never negative.
    pub quantity: i64,

    /// When the record was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Garment {
    /// Returns a copy with the patch's fields written over this record.
    ///
    /// Fields the patch leaves as `None` keep their current value. An empty
    /// `name` clears the name. The patch is expected to be validated already.
    pub fn apply(&self, patch: &GarmentPatch) -> Garment {
        let mut next = self.clone();

        if let Some(style) = &patch.style {
            next.style = style.clone();
        }
        if let Some(size) = &patch.size {
            next.size = size.clone();
        }
        if let Some(color) = &patch.color {
            next.color = color.clone();
        }
        if let Some(quantity) = patch.quantity {
            next.quantity = quantity;
        }
        if let Some(name) = &patch.name {
            next.name = if name.is_empty() {
                None
            } else {
                Some(name.clone())
            };
        }

        next
    }

    /// Parses the stored size back into a [`Size`].
    pub fn parsed_size(&self) -> Option<Size> {
        Size::parse(&self.size).ok()
    }
}

// =============================================================================
// New Garment
// =============================================================================

/// Fields for a garment that does not exist yet.
///
/// ## Example
/// ```rust
/// use threadcount_core::NewGarment;
///
/// let shirt = NewGarment::new("T-Shirt", "M", "Blue").quantity(10);
/// assert_eq!(shirt.quantity, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewGarment {
    pub style: String,
    pub size: String,
    pub color: String,
    /// Defaults to zero when not given.
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl NewGarment {
    /// Creates the input with the three required fields.
    pub fn new(
        style: impl Into<String>,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        NewGarment {
            style: style.into(),
            size: size.into(),
            color: color.into(),
            quantity: None,
            name: None,
        }
    }

    /// Sets the initial quantity.
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// =============================================================================
// Garment Patch
// =============================================================================

/// A partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GarmentPatch {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    /// `Some("")` clears the name.
    #[serde(default)]
    pub name: Option<String>,
}

impl GarmentPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        GarmentPatch::default()
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.style.is_none()
            && self.size.is_none()
            && self.color.is_none()
            && self.quantity.is_none()
            && self.name.is_none()
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// How filter values are compared with stored values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Field equals the filter value.
    #[default]
    Exact,
    /// Field contains the filter value, ignoring ASCII case.
    Contains,
}

/// Criteria for `list` and `count`. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GarmentFilter {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub match_mode: MatchMode,
}

impl GarmentFilter {
    /// Matches every record.
    pub fn all() -> Self {
        GarmentFilter::default()
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn contains(mut self) -> Self {
        self.match_mode = MatchMode::Contains;
        self
    }

    /// Trims values, drops blank ones, and canonicalises an exact size so
    /// that `m` finds rows stored as `M`.
    pub fn normalized(&self) -> GarmentFilter {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        let mut size = clean(&self.size);
        if self.match_mode == MatchMode::Exact {
            size = size.map(|s| match Size::parse(&s) {
                Ok(parsed) => parsed.as_str().to_string(),
                Err(_) => s,
            });
        }

        GarmentFilter {
            style: clean(&self.style),
            size,
            color: clean(&self.color),
            name: clean(&self.name),
            match_mode: self.match_mode,
        }
    }

    /// True when no criteria are set.
    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.size.is_none() && self.color.is_none() && self.name.is_none()
    }

    /// In-memory version of the SQL predicate, for callers holding records.
    pub fn matches(&self, garment: &Garment) -> bool {
        let filter = self.normalized();
        let test = |wanted: &Option<String>, actual: Option<&str>| match wanted {
            None => true,
            Some(wanted) => match (filter.match_mode, actual) {
                (_, None) => false,
                (MatchMode::Exact, Some(actual)) => actual == wanted.as_str(),
                (MatchMode::Contains, Some(actual)) => actual
                    .to_ascii_lowercase()
                    .contains(&wanted.to_ascii_lowercase()),
            },
        };

        test(&filter.style, Some(&garment.style))
            && test(&filter.size, Some(&garment.size))
            && test(&filter.color, Some(&garment.color))
            && test(&filter.name, garment.name.as_deref())
    }
}

// =============================================================================
// Import Report
// =============================================================================

/// A CSV row that was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SkippedRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub reason: String,
}

/// Outcome of a bulk CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportReport {
    /// Ids assigned to the imported rows, in file order.
    pub imported_ids: Vec<i64>,
    pub skipped: Vec<SkippedRow>,
}

impl ImportReport {
    pub fn imported(&self) -> usize {
        self.imported_ids.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

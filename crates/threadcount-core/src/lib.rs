//! # threadcount-core: Pure Domain Logic for Threadcount
//!
//! Garment types, size normalisation and validation, with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Threadcount Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (threadcount CLI)                  │   │
//! │  │      add ──► list ──► update ──► delete ──► import/export       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ threadcount-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   size    │  │ validation│                  │   │
//! │  │   │  Garment  │  │   Size    │  │   rules   │                  │   │
//! │  │   │  Patch    │  │ LetterSize│  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                threadcount-db (Inventory Store)                 │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Garment, NewGarment, GarmentPatch, GarmentFilter)
//! - [`size`] - Size value type (letter sizes and numeric sizes)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation and normalisation
//!
//! ## Example Usage
//!
//! ```rust
//! use threadcount_core::{GarmentPatch, NewGarment};
//!
//! let input = NewGarment::new("T-Shirt", "m", "Blue").quantity(10);
//! let valid = input.validated().unwrap();
//! assert_eq!(valid.size, "M");
//!
//! let patch = GarmentPatch::new().quantity(5);
//! assert!(!patch.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod size;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use size::{LetterSize, Size};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Quantity recorded when a new garment does not specify one.
pub const DEFAULT_QUANTITY: i64 = 0;

/// Maximum length of a style label.
pub const MAX_STYLE_LEN: usize = 100;

/// Maximum length of a color label.
pub const MAX_COLOR_LEN: usize = 50;

/// Maximum length of a display name.
pub const MAX_NAME_LEN: usize = 200;

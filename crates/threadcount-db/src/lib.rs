//! # threadcount-db: Inventory Store for Threadcount
//!
//! This crate owns the persisted garment records. It uses a single-file
//! SQLite database with sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Threadcount Data Flow                            │
//! │                                                                         │
//! │  CLI command (threadcount list --color Blue)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  threadcount-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (garment.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ one SQLite    │◄───│ GarmentRepo   │    │ 001_create_  │  │   │
//! │  │   │ connection    │    │ csv_io        │    │ garments.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/threadcount/garments.db (platform data dir)   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening, configuring and closing the database
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Garment CRUD
//! - [`csv_io`] - CSV row parsing and writing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use threadcount_core::{GarmentFilter, NewGarment};
//! use threadcount_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("garments.db")).await?;
//!
//! let shirt = db.garments().insert(&NewGarment::new("T-Shirt", "M", "Blue")).await?;
//! let medium = db.garments().list(&GarmentFilter::all().size("M")).await?;
//!
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod csv_io;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ErrorKind};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig, IN_MEMORY_PATH};

pub use repository::garment::GarmentRepository;

//! # Repository Module
//!
//! Database repository implementations for Threadcount.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.garments().list(&GarmentFilter::all().size("M"))           │
//! │       ▼                                                                 │
//! │  GarmentRepository                                                     │
//! │  ├── insert(&self, new)                                                │
//! │  ├── get(&self, id) / find(&self, id)                                  │
//! │  ├── list(&self, filter) / count(&self, filter)                        │
//! │  ├── update(&self, id, patch)                                          │
//! │  ├── adjust_quantity(&self, id, delta)                                 │
//! │  ├── delete(&self, id)                                                 │
//! │  └── import_csv / export_csv                                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`GarmentRepository`](garment::GarmentRepository) - Garment CRUD, stock adjustments, CSV

pub mod garment;

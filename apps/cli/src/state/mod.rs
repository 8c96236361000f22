//! # Application State
//!
//! The CLI runs one command per process, so the only state is the resolved
//! configuration. The `Database` handle itself is opened in `run` and
//! passed by reference to the command layer.

pub mod config;

pub use config::{AppConfig, PathSource};

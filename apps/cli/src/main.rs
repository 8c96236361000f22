//! Threadcount command-line entry point.
//!
//! All logic lives in the library crate (`threadcount_cli`); this file only
//! hands the process exit code back to the OS.

use std::process::ExitCode;

fn main() -> ExitCode {
    threadcount_cli::run()
}

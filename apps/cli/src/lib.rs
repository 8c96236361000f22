//! # Threadcount CLI Library
//!
//! The presentation layer: parses a command line, forwards it to the
//! inventory store and prints the result or the error.
//!
//! ## Module Organization
//! ```text
//! threadcount_cli/
//! ├── lib.rs          ◄─── You are here (argument parsing & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State exports
//! │   └── config.rs   ◄─── Database path / lock resolution
//! ├── commands/
//! │   ├── mod.rs      ◄─── Subcommand definitions & dispatch
//! │   ├── garment.rs  ◄─── add/get/list/update/delete/adjust
//! │   ├── transfer.rs ◄─── CSV import/export
//! │   └── status.rs   ◄─── Diagnostics
//! ├── output.rs       ◄─── Table / JSON rendering
//! └── error.rs        ◄─── CLI error type and exit codes
//! ```

pub mod commands;
pub mod error;
pub mod output;
pub mod state;

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::Command;
use error::CliError;
use state::AppConfig;
use threadcount_db::Database;

/// Track garment inventory (style, size, color, quantity) in a local database.
#[derive(Debug, Parser)]
#[command(name = "threadcount", version, about)]
pub struct Cli {
    /// Database file (overrides THREADCOUNT_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Runs the CLI and returns the process exit code.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Lifecycle                                 │
/// │                                                                         │
/// │  1. Parse arguments (clap exits on --help / usage errors)              │
/// │  2. Initialize logging (stderr, RUST_LOG or default filter)            │
/// │  3. Resolve config: --db → THREADCOUNT_DB_PATH → data dir              │
/// │  4. Open database (create file, pragmas, migrations)                   │
/// │     └── failure here is fatal: message + exit 4, no command runs      │
/// │  5. Execute one command                                                │
/// │  6. Close database (checkpoint, release lock)                          │
/// │  7. Print outcome to stdout / error to stderr                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    init_tracing();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            let err = CliError::io(format!("Could not start runtime: {}", e));
            report_error(&err, json);
            return ExitCode::from(err.code.exit_code());
        }
    };

    match runtime.block_on(run_cli(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, json);
            ExitCode::from(err.code.exit_code())
        }
    }
}

/// Opens the store, runs the command, closes the store and prints.
pub async fn run_cli(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::from_env(cli.db)?;
    config.prepare()?;

    debug!(?config, "Configuration resolved");

    let db = open_database(&config).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = commands::execute(&db, cli.command, &mut out).await;
    db.close().await;

    let text = result?.render(cli.json)?;
    if !text.is_empty() {
        writeln!(out, "{}", text)?;
    }
    out.flush()?;

    Ok(())
}

/// Opens the database, keeping the real cause in the message: a failure
/// here means nothing else can run.
async fn open_database(config: &AppConfig) -> Result<Database, CliError> {
    let db = Database::new(config.db_config()).await.map_err(|e| {
        tracing::error!(path = %config.database_path.display(), error = %e, "Cannot open database");
        CliError::storage(format!(
            "Cannot open database {}: {}",
            config.database_path.display(),
            e
        ))
    })?;

    info!(path = %config.database_path.display(), "Database ready");
    Ok(db)
}

fn report_error(err: &CliError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(text) => eprintln!("{}", text),
            Err(_) => eprintln!("error: {}", err),
        }
    } else {
        eprintln!("error: {}", err);
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=threadcount=trace` - Show trace for threadcount crates only
/// - Default: `info,threadcount=debug,sqlx=warn`
///
/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,threadcount=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::output::Outcome;
    use threadcount_db::DbConfig;

    async fn memory_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["threadcount"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    async fn exec(db: &Database, args: &[&str]) -> Result<Outcome, CliError> {
        let mut sink = Vec::new();
        commands::execute(db, parse(args).command, &mut sink).await
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["list", "--color", "Blue", "--json", "--db", "x.db"]);
        assert!(cli.json);
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
    }

    #[test]
    fn test_negative_delta_parses() {
        let cli = parse(&["adjust", "3", "-2"]);
        assert!(matches!(cli.command, Command::Adjust { id: 3, delta: -2 }));
    }

    #[test]
    fn test_add_requires_fields() {
        let result = Cli::try_parse_from(["threadcount", "add", "--style", "Tee"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_usage_errors_keep_their_own_exit_code() {
        let err = Cli::try_parse_from(["threadcount", "adjust", "x", "1"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let ours = [
            ErrorCode::ValidationError,
            ErrorCode::NotFound,
            ErrorCode::StorageError,
            ErrorCode::IoError,
        ];
        assert!(ours.iter().all(|c| i32::from(c.exit_code()) != err.exit_code()));
    }

    #[tokio::test]
    async fn test_add_get_update_delete() {
        let db = memory_db().await;

        let added = exec(
            &db,
            &["add", "--style", "T-Shirt", "--size", "m", "--color", "Blue", "--quantity", "10"],
        )
        .await
        .unwrap();
        let Outcome::Garment(shirt) = added else {
            panic!("expected a garment");
        };
        assert_eq!(shirt.id, 1);
        assert_eq!(shirt.size, "M");

        let updated = exec(&db, &["update", "1", "--quantity", "5"]).await.unwrap();
        let Outcome::Garment(updated) = updated else {
            panic!("expected a garment");
        };
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.color, "Blue");

        exec(&db, &["delete", "1"]).await.unwrap();

        let err = exec(&db, &["get", "1"]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_validation_error_code() {
        let db = memory_db().await;

        let err = exec(&db, &["add", "--style", "", "--size", "M", "--color", "Blue"])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.code.exit_code(), 6);

        let err = exec(
            &db,
            &["add", "--style", "Tee", "--size", "M", "--color", "Blue", "--quantity", "-4"],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_adjust_below_zero() {
        let db = memory_db().await;
        exec(&db, &["add", "--style", "Tee", "--size", "S", "--color", "Red", "--quantity", "1"])
            .await
            .unwrap();

        let err = exec(&db, &["adjust", "1", "-2"]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_list_contains_filter() {
        let db = memory_db().await;
        for color in ["Navy Blue", "Sky Blue", "Red"] {
            exec(&db, &["add", "--style", "Tee", "--size", "S", "--color", color])
                .await
                .unwrap();
        }

        let Outcome::Garments(blues) = exec(&db, &["list", "--color", "blue", "--contains"])
            .await
            .unwrap()
        else {
            panic!("expected garments");
        };
        assert_eq!(blues.len(), 2);

        let Outcome::Garments(exact) = exec(&db, &["list", "--color", "blue"]).await.unwrap()
        else {
            panic!("expected garments");
        };
        assert!(exact.is_empty());
    }

    #[tokio::test]
    async fn test_export_to_stdout_then_import_file() {
        let db = memory_db().await;
        exec(&db, &["add", "--style", "Polo", "--size", "L", "--color", "White", "--name", "Core"])
            .await
            .unwrap();

        let mut stdout = Vec::new();
        let outcome = commands::execute(&db, parse(&["export"]).command, &mut stdout)
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Exported { count: 1, path: None }));

        let csv = String::from_utf8(stdout).unwrap();
        assert_eq!(csv, "name,size,color,style,quantity\nCore,L,White,Polo,0\n");

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("garments.csv");
        std::fs::write(&file, &csv).unwrap();

        let other = memory_db().await;
        let outcome = exec(&other, &["import", file.to_str().unwrap()])
            .await
            .unwrap();
        let Outcome::Imported(report) = outcome else {
            panic!("expected an import report");
        };
        assert_eq!(report.imported(), 1);
    }

    #[tokio::test]
    async fn test_import_missing_file_is_io_error() {
        let db = memory_db().await;
        let err = exec(&db, &["import", "/definitely/not/here.csv"])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::IoError);
    }

    #[tokio::test]
    async fn test_status() {
        let db = memory_db().await;
        let Outcome::Status(status) = exec(&db, &["status"]).await.unwrap() else {
            panic!("expected status");
        };
        assert!(status.healthy);
        assert_eq!(status.garments, 0);
        assert_eq!(status.migrations_applied, status.migrations_total);
    }

    #[tokio::test]
    async fn test_unopenable_database_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::resolve(
            Some(dir.path().join("missing").join("garments.db")),
            |_| None,
            || None,
        )
        .unwrap();

        let err = open_database(&config).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(err.message.contains("garments.db"));
    }
}

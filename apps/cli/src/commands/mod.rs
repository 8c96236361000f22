//! # Commands
//!
//! One subcommand per store operation. Each handler takes the open
//! `Database`, calls exactly one repository method and returns an
//! [`Outcome`] for rendering. No field rules live here: the store validates
//! every write.
//!
//! ## Command Map
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────────┐
//! │  Subcommand                  │  Store call                          │
//! ├──────────────────────────────┼──────────────────────────────────────┤
//! │  add --style --size --color  │  GarmentRepository::insert           │
//! │  get <ID>                    │  GarmentRepository::get              │
//! │  list [filters]              │  GarmentRepository::list             │
//! │  update <ID> [fields]        │  GarmentRepository::update           │
//! │  delete <ID>                 │  GarmentRepository::delete           │
//! │  adjust <ID> <DELTA>         │  GarmentRepository::adjust_quantity  │
//! │  import <FILE>               │  GarmentRepository::import_csv       │
//! │  export [FILE] [filters]     │  GarmentRepository::export_csv       │
//! │  status                      │  Database::health_check + counts     │
//! └──────────────────────────────┴──────────────────────────────────────┘
//! ```

pub mod garment;
pub mod status;
pub mod transfer;

use clap::{Args, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::error::CliError;
use crate::output::Outcome;
use threadcount_core::{GarmentFilter, GarmentPatch, NewGarment};
use threadcount_db::Database;

/// Subcommands of `threadcount`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a garment
    Add(AddArgs),

    /// Show one garment
    Get {
        /// Garment id
        id: i64,
    },

    /// List garments, optionally filtered
    List(FilterArgs),

    /// Change fields of a garment
    Update(UpdateArgs),

    /// Delete a garment permanently
    Delete {
        /// Garment id
        id: i64,
    },

    /// Add to (or, with a negative delta, take from) the quantity on hand
    Adjust {
        /// Garment id
        id: i64,

        /// Signed change, e.g. 5 or -2
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Import garments from a `name,size,color,style,quantity` CSV file
    Import {
        /// CSV file to read
        file: PathBuf,
    },

    /// Export garments as CSV (to stdout when no file is given)
    Export {
        /// CSV file to write
        file: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show database location, health and record count
    Status,
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Style, e.g. "T-Shirt"
    #[arg(long)]
    pub style: String,

    /// Letter size (XS..XXXL, OS) or a number
    #[arg(long)]
    pub size: String,

    #[arg(long)]
    pub color: String,

    /// Units on hand (default 0)
    #[arg(long, allow_negative_numbers = true)]
    pub quantity: Option<i64>,

    /// Optional display name
    #[arg(long)]
    pub name: Option<String>,
}

impl From<AddArgs> for NewGarment {
    fn from(args: AddArgs) -> Self {
        NewGarment {
            style: args.style,
            size: args.size,
            color: args.color,
            quantity: args.quantity,
            name: args.name,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Garment id
    pub id: i64,

    #[arg(long)]
    pub style: Option<String>,

    #[arg(long)]
    pub size: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub quantity: Option<i64>,

    /// New display name; pass "" to clear it
    #[arg(long)]
    pub name: Option<String>,
}

impl UpdateArgs {
    pub fn patch(&self) -> GarmentPatch {
        GarmentPatch {
            style: self.style.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
            quantity: self.quantity,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub style: Option<String>,

    #[arg(long)]
    pub size: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Match substrings, ignoring case, instead of whole values
    #[arg(long)]
    pub contains: bool,
}

impl From<FilterArgs> for GarmentFilter {
    fn from(args: FilterArgs) -> Self {
        let filter = GarmentFilter {
            style: args.style,
            size: args.size,
            color: args.color,
            name: args.name,
            ..GarmentFilter::default()
        };

        if args.contains {
            filter.contains()
        } else {
            filter
        }
    }
}

/// Runs one command against an open database.
///
/// `out` receives raw command output that bypasses rendering (the CSV from
/// `export` without a file).
pub async fn execute(
    db: &Database,
    command: Command,
    out: &mut dyn Write,
) -> Result<Outcome, CliError> {
    match command {
        Command::Add(args) => garment::add(db, args.into()).await,
        Command::Get { id } => garment::get(db, id).await,
        Command::List(filter) => garment::list(db, filter.into()).await,
        Command::Update(args) => garment::update(db, args.id, args.patch()).await,
        Command::Delete { id } => garment::delete(db, id).await,
        Command::Adjust { id, delta } => garment::adjust(db, id, delta).await,
        Command::Import { file } => transfer::import(db, &file).await,
        Command::Export { file, filter } => {
            transfer::export(db, file.as_deref(), filter.into(), out).await
        }
        Command::Status => status::status(db).await,
    }
}

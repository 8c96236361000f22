//! # Seed Data Generator
//!
//! Populates the database with sample garments for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 garments (default)
//! cargo run -p threadcount-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p threadcount-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p threadcount-db --bin seed -- --db ./data/garments.db
//! ```
//!
//! ## Generated Garments
//! Cycles through every style × color × size combination:
//! - Styles: tees, polos, hoodies, jeans, ...
//! - Letter sizes for tops, numeric waist sizes for bottoms
//! - Quantity: 0 - 40
//! - Every fifth garment gets a collection name

use std::env;
use threadcount_core::{GarmentFilter, NewGarment};
use threadcount_db::{Database, DbConfig};

/// Styles paired with the sizes they come in.
const STYLES: &[(&str, &[&str])] = &[
    ("T-Shirt", &["XS", "S", "M", "L", "XL", "XXL"]),
    ("Polo", &["S", "M", "L", "XL"]),
    ("Hoodie", &["S", "M", "L", "XL", "XXL"]),
    ("Crewneck Sweater", &["S", "M", "L", "XL"]),
    ("Tank Top", &["XS", "S", "M", "L"]),
    ("Beanie", &["OS"]),
    ("Jeans", &["28", "30", "32", "34", "36", "38"]),
    ("Chinos", &["30", "32", "34", "36"]),
    ("Shorts", &["S", "M", "L", "XL"]),
];

const COLORS: &[&str] = &[
    "Black", "White", "Navy", "Heather Grey", "Forest Green", "Burgundy", "Sand",
];

const COLLECTIONS: &[&str] = &["Spring Drop", "Core", "Summer Sale", "Staff Picks"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./threadcount_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Threadcount Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of garments to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./threadcount_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Threadcount Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Garments: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let garments = db.garments();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = garments.count(&GarmentFilter::all()).await?;
    if existing > 0 {
        println!("⚠ Database already has {} garments", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    println!();
    println!("Generating garments...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for (seed, input) in sample_garments().take(count).enumerate() {
        if let Err(e) = garments.insert(&input).await {
            eprintln!("Failed to insert {} {} {}: {}", input.style, input.size, input.color, e);
            continue;
        }

        generated += 1;

        if (seed + 1) % 100 == 0 {
            println!("  Generated {} garments...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} garments in {:?}", generated, elapsed);

    // Spot check the filters
    let medium = garments.count(&GarmentFilter::all().size("M")).await?;
    println!("  Size M: {} garments", medium);

    let navy = garments.count(&GarmentFilter::all().color("navy").contains()).await?;
    println!("  Color ~ 'navy': {} garments", navy);

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Endless stream of sample garments, cycling through the catalogue.
fn sample_garments() -> impl Iterator<Item = NewGarment> {
    let catalogue: Vec<(&str, &str, &str)> = STYLES
        .iter()
        .flat_map(|(style, sizes)| {
            sizes.iter().flat_map(move |size| {
                COLORS.iter().map(move |color| (*style, *size, *color))
            })
        })
        .collect();

    catalogue
        .into_iter()
        .cycle()
        .enumerate()
        .map(|(seed, (style, size, color))| {
            let garment = NewGarment::new(style, size, color).quantity(((seed * 7) % 41) as i64);

            if seed % 5 == 0 {
                garment.name(COLLECTIONS[seed / 5 % COLLECTIONS.len()])
            } else {
                garment
            }
        })
}

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use swap_data::{ChecklistLoader, FlatLoader};
use swap_db_sqlite::SqliteRepository;

/// Import FlatSwaps data from CSV files.
#[derive(Parser, Debug)]
#[command(name = "swap-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load flat listings into the database.
    ///
    /// Columns: id, owner_id, title, description, address, city, country,
    /// postal_code, rent_amount, deposit_amount, available_from,
    /// available_until, room_count, bathroom_count, max_guests, size_sqm,
    /// furnished, pets_allowed, smoking_allowed, amenities (`;`-separated).
    Flats {
        /// Path to the CSV file containing flat listings
        #[arg(short, long)]
        file: PathBuf,

        /// SQLite database URL (e.g., sqlite:flatswaps.db?mode=rwc to create if missing)
        #[arg(short, long, default_value = "sqlite:flatswaps.db?mode=rwc")]
        database: String,

        /// Run database migrations before loading data
        #[arg(short, long, default_value_t = false)]
        migrate: bool,

        /// Run seed files from the specified directory after migrations
        #[arg(short, long)]
        seeds: Option<PathBuf>,
    },
    /// Check a checklist catalog CSV and print its sections.
    Checklist {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    match Args::parse().command {
        Command::Flats {
            file,
            database,
            migrate,
            seeds,
        } => load_flats(file, &database, migrate, seeds).await,
        Command::Checklist { file } => check_checklist(file),
    }
}

async fn load_flats(
    file: PathBuf,
    database: &str,
    migrate: bool,
    seeds: Option<PathBuf>,
) -> Result<()> {
    let repo = SqliteRepository::new(database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", database))?;

    if migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    if let Some(seeds_dir) = &seeds {
        println!("Running seeds from: {}", seeds_dir.display());
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
        println!("Seeds complete.");
    }

    println!("Loading flats from: {}", file.display());

    let reader = File::open(&file).with_context(|| format!("Failed to open: {}", file.display()))?;
    let records = FlatLoader::parse(reader)
        .with_context(|| format!("Failed to parse CSV: {}", file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let written = FlatLoader::load(&repo, &records)
        .await
        .context("Failed to load flats into database")?;

    println!("Successfully loaded {} flats into the database.", written);

    Ok(())
}

fn check_checklist(file: PathBuf) -> Result<()> {
    let reader = File::open(&file).with_context(|| format!("Failed to open: {}", file.display()))?;
    let checklist = ChecklistLoader::parse(reader)
        .with_context(|| format!("Failed to parse checklist: {}", file.display()))?;

    for section in &checklist.sections {
        println!("{} ({}): {} items", section.title, section.urgency, section.items.len());
    }
    println!(
        "{} items, {} urgent",
        checklist.total_items(),
        checklist.urgent_items().len()
    );
    Ok(())
}

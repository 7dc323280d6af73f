//! Flat import against the SQLite backend.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use sqlx::sqlite::SqlitePoolOptions;
use swap_core::SwapRepository;
use swap_data::{FlatLoader, LoaderError, builtin_checklist};
use swap_db_sqlite::SqliteRepository;

const FLATS_CSV: &str = include_str!("../test-data/flats.csv");

/// Migrated database with no seed data.
async fn setup_test_db() -> SqliteRepository {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    let repo = SqliteRepository::new_with_pool(pool).await;
    repo.run_migrations()
        .await
        .expect("Failed to run migrations");

    repo
}

#[tokio::test]
async fn test_load_sample_flats() {
    let repo = setup_test_db().await;

    let records = FlatLoader::parse(FLATS_CSV.as_bytes()).expect("Failed to parse CSV");
    let written = FlatLoader::load(&repo, &records)
        .await
        .expect("Failed to load flats");

    assert_eq!(written, 3);

    let rome = repo.get_flat("rome-trastevere").await.expect("Should find Rome flat");
    assert_eq!(rome.rent_amount, Some(dec!(1200)));
    assert_eq!(rome.amenities, vec!["wifi", "heating", "balcony", "dishwasher"]);
    assert!(rome.pets_allowed);

    let paris = repo.get_flat("paris-marais").await.expect("Should find Paris flat");
    assert_eq!(paris.description, None);
    assert_eq!(paris.available_from, None);
    assert_eq!(paris.size_sqm, Some(dec!(28.5)));
}

#[tokio::test]
async fn test_reload_replaces_rows() {
    let repo = setup_test_db().await;
    let records = FlatLoader::parse(FLATS_CSV.as_bytes()).unwrap();

    FlatLoader::load(&repo, &records).await.unwrap();
    FlatLoader::load(&repo, &records).await.unwrap();

    assert_eq!(repo.list_flats("carlos").await.unwrap().len(), 1);
    assert_eq!(repo.list_flats("marco").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_bad_row_loads_nothing() {
    let csv = FLATS_CSV.replacen("2025-08-31", "2025-05-01", 1);

    let err = FlatLoader::parse(csv.as_bytes()).unwrap_err();

    assert!(matches!(err, LoaderError::InvalidRecord { line: 2, .. }));
}

#[test]
fn test_builtin_checklist_is_valid() {
    let checklist = builtin_checklist().expect("Shipped checklist should parse");

    assert_eq!(checklist.total_items(), 36);
    assert_eq!(checklist.items_by_timeframe("after arrival").len(), 3);
}

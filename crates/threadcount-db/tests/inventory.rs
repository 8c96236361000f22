//! End-to-end behaviour of the inventory store against real SQLite databases.

use std::path::Path;
use std::time::Duration;

use threadcount_core::{GarmentFilter, GarmentPatch, NewGarment};
use threadcount_db::{Database, DbConfig, DbError, ErrorKind};

async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn add_to_empty_store_assigns_id_one() {
    let db = memory_db().await;

    let shirt = db
        .garments()
        .insert(&NewGarment::new("T-Shirt", "M", "Blue").quantity(10))
        .await
        .unwrap();
    assert_eq!(shirt.id, 1);

    let all = db.garments().list(&GarmentFilter::all()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].style, "T-Shirt");
    assert_eq!(all[0].size, "M");
    assert_eq!(all[0].color, "Blue");
    assert_eq!(all[0].quantity, 10);
}

#[tokio::test]
async fn update_quantity_leaves_other_fields() {
    let db = memory_db().await;
    let repo = db.garments();
    let shirt = repo
        .insert(&NewGarment::new("T-Shirt", "M", "Blue").quantity(10))
        .await
        .unwrap();

    repo.update(shirt.id, &GarmentPatch::new().quantity(5))
        .await
        .unwrap();

    let stored = repo.get(shirt.id).await.unwrap();
    assert_eq!(stored.quantity, 5);
    assert_eq!(stored.style, "T-Shirt");
    assert_eq!(stored.size, "M");
    assert_eq!(stored.color, "Blue");
    assert_eq!(stored.created_at, shirt.created_at);
    assert!(stored.updated_at >= shirt.updated_at);
}

#[tokio::test]
async fn deleted_garment_is_not_found() {
    let db = memory_db().await;
    let repo = db.garments();
    let shirt = repo
        .insert(&NewGarment::new("T-Shirt", "M", "Blue"))
        .await
        .unwrap();

    repo.delete(shirt.id).await.unwrap();

    let err = repo.get(shirt.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(repo.list(&GarmentFilter::all()).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_style_is_rejected_and_nothing_stored() {
    let db = memory_db().await;
    let repo = db.garments();

    let err = repo
        .insert(&NewGarment::new("", "M", "Blue"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Validation(ref v) if v.field() == "style"));

    assert_eq!(repo.count(&GarmentFilter::all()).await.unwrap(), 0);
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn add_then_get_returns_same_fields() {
    let db = memory_db().await;
    let repo = db.garments();

    let inputs = [
        NewGarment::new("Hoodie", "xl", "Black").quantity(3),
        NewGarment::new("Jeans", "32", "Indigo"),
        NewGarment::new("Beanie", "one size", "Red").name("Winter"),
    ];

    for input in &inputs {
        let added = repo.insert(input).await.unwrap();
        let fetched = repo.get(added.id).await.unwrap();
        assert_eq!(fetched, added);
    }

    let beanie = repo.get(3).await.unwrap();
    assert_eq!(beanie.size, "OS");
    assert_eq!(beanie.name.as_deref(), Some("Winter"));
}

#[tokio::test]
async fn ids_are_never_reused() {
    let db = memory_db().await;
    let repo = db.garments();

    let first = repo.insert(&NewGarment::new("Tee", "S", "Red")).await.unwrap();
    let second = repo.insert(&NewGarment::new("Tee", "M", "Red")).await.unwrap();
    repo.delete(second.id).await.unwrap();

    let third = repo.insert(&NewGarment::new("Tee", "L", "Red")).await.unwrap();
    assert!(third.id > second.id);
    assert_ne!(third.id, first.id);
}

#[tokio::test]
async fn quantity_never_goes_negative() {
    let db = memory_db().await;
    let repo = db.garments();
    let tee = repo
        .insert(&NewGarment::new("Tee", "S", "Red").quantity(2))
        .await
        .unwrap();

    assert!(repo
        .update(tee.id, &GarmentPatch::new().quantity(-1))
        .await
        .unwrap_err()
        .is_validation());
    assert!(repo
        .adjust_quantity(tee.id, -3)
        .await
        .unwrap_err()
        .is_validation());

    assert_eq!(repo.get(tee.id).await.unwrap().quantity, 2);
}

#[tokio::test]
async fn filters_combine_with_and() {
    let db = memory_db().await;
    let repo = db.garments();

    for (style, size, color) in [
        ("T-Shirt", "M", "Blue"),
        ("T-Shirt", "L", "Blue"),
        ("T-Shirt", "M", "Red"),
        ("Polo", "M", "Blue"),
    ] {
        repo.insert(&NewGarment::new(style, size, color)).await.unwrap();
    }

    let filter = GarmentFilter::all().style("T-Shirt").size("m").color("Blue");
    let hits = repo.list(&filter).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 1);

    let medium = repo.list(&GarmentFilter::all().size("M")).await.unwrap();
    let ids: Vec<i64> = medium.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);

    let none = repo.list(&GarmentFilter::all().color("Green")).await.unwrap();
    assert!(none.is_empty());

    let all = repo.list(&GarmentFilter::all()).await.unwrap();
    assert!(all.iter().all(|g| GarmentFilter::all().matches(g)));
    assert_eq!(
        all.iter().filter(|g| filter.normalized().matches(g)).count(),
        1
    );
}

// =============================================================================
// CSV
// =============================================================================

#[tokio::test]
async fn import_skips_bad_rows_and_reports_them() {
    let db = memory_db().await;
    let repo = db.garments();

    let input = "\
name,size,color,style,quantity
Core,M,Blue,T-Shirt,10
,32,Black,Jeans,4
broken row
Core,M,Blue,T-Shirt,many
";
    let report = repo.import_csv(input.as_bytes()).await.unwrap();

    assert_eq!(report.imported(), 2);
    assert_eq!(report.imported_ids, vec![1, 2]);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].line, 4);
    assert_eq!(report.skipped[1].line, 5);

    let jeans = repo.get(2).await.unwrap();
    assert_eq!(jeans.style, "Jeans");
    assert_eq!(jeans.name, None);
    assert_eq!(jeans.quantity, 4);
}

#[tokio::test]
async fn unreadable_import_writes_nothing() {
    let db = memory_db().await;
    let repo = db.garments();

    let input: &[u8] = b"Core,M,Blue,T-Shirt,10\n\xff,M,Blue,T-Shirt,1\n";
    let err = repo.import_csv(input).await.unwrap_err();

    assert!(err.is_storage());
    assert_eq!(repo.count(&GarmentFilter::all()).await.unwrap(), 0);
}

#[tokio::test]
async fn export_then_import_into_second_store() {
    let source = memory_db().await;
    for input in [
        NewGarment::new("Polo, Slim Fit", "L", "White").quantity(7).name("Core"),
        NewGarment::new("Jeans", "34", "Indigo").quantity(2),
        NewGarment::new("Tee", "S", "Red"),
    ] {
        source.garments().insert(&input).await.unwrap();
    }

    let mut buffer = Vec::new();
    let written = source
        .garments()
        .export_csv(&mut buffer, &GarmentFilter::all())
        .await
        .unwrap();
    assert_eq!(written, 3);

    let target = memory_db().await;
    let report = target.garments().import_csv(buffer.as_slice()).await.unwrap();
    assert_eq!(report.imported(), 3);
    assert!(report.skipped.is_empty());

    let before = source.garments().list(&GarmentFilter::all()).await.unwrap();
    let after = target.garments().list(&GarmentFilter::all()).await.unwrap();
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(
            (&a.name, &a.style, &a.size, &a.color, a.quantity),
            (&b.name, &b.style, &b.size, &b.color, b.quantity)
        );
    }
}

#[tokio::test]
async fn export_respects_filter() {
    let db = memory_db().await;
    db.garments()
        .insert(&NewGarment::new("Tee", "S", "Red"))
        .await
        .unwrap();
    db.garments()
        .insert(&NewGarment::new("Tee", "S", "Blue"))
        .await
        .unwrap();

    let mut buffer = Vec::new();
    let written = db
        .garments()
        .export_csv(&mut buffer, &GarmentFilter::all().color("Blue"))
        .await
        .unwrap();

    assert_eq!(written, 1);
    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.ends_with(",S,Blue,Tee,0\n"));
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn records_survive_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garments.db");

    let db = Database::open(&path).await.unwrap();
    let shirt = db
        .garments()
        .insert(&NewGarment::new("T-Shirt", "M", "Blue").quantity(10))
        .await
        .unwrap();
    db.close().await;

    let reopened = Database::open(&path).await.unwrap();
    assert_eq!(reopened.garments().get(shirt.id).await.unwrap(), shirt);
    assert!(reopened.migration_status().await.unwrap().is_current());
    reopened.close().await;
}

#[tokio::test]
async fn closed_store_reports_storage_error() {
    let db = memory_db().await;
    db.close().await;

    let err = db.garments().get(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
}

#[tokio::test]
async fn second_handle_is_locked_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garments.db");

    let first = Database::open(&path).await.unwrap();
    first.garments().list(&GarmentFilter::all()).await.unwrap();

    let err = Database::new(
        DbConfig::new(&path)
            .exclusive(false)
            .busy_timeout(Duration::from_millis(200))
            .connect_timeout(Duration::from_secs(2)),
    )
    .await
    .unwrap_err();
    assert!(err.is_storage(), "unexpected error: {err:?}");

    first.close().await;

    let second = Database::open(&path).await.unwrap();
    assert!(second.health_check().await);
    second.close().await;
}

// =============================================================================
// Legacy files
// =============================================================================

/// Writes a file in the layout used before migrations existed.
async fn legacy_file(path: &Path, with_quantity: bool, rows: &str) {
    let db = Database::new(DbConfig::new(path).run_migrations(false).exclusive(false))
        .await
        .unwrap();

    let quantity = if with_quantity {
        ",\n            quantity INTEGER NOT NULL DEFAULT 0"
    } else {
        ""
    };
    let schema = format!(
        "CREATE TABLE garments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            size TEXT NOT NULL,
            color TEXT NOT NULL,
            style TEXT NOT NULL{quantity}
        );"
    );
    sqlx::raw_sql(&schema).execute(db.pool()).await.unwrap();
    sqlx::raw_sql(rows).execute(db.pool()).await.unwrap();
    db.close().await;
}

#[tokio::test]
async fn legacy_file_is_upgraded_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garments.db");
    legacy_file(
        &path,
        true,
        "INSERT INTO garments (name, size, color, style, quantity) VALUES
            ('Classic', 'm', 'Blue', 'T-Shirt', 4),
            ('', '10.0', ' Red ', 'Jeans', 0),
            ('Retired', 'L', 'Black', 'Hoodie', 1);
         DELETE FROM garments WHERE id = 3;",
    )
    .await;

    let db = Database::open(&path).await.unwrap();
    let repo = db.garments();

    let all = repo.list(&GarmentFilter::all()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, 1);
    assert_eq!(all[0].name.as_deref(), Some("Classic"));
    assert_eq!(all[0].size, "M");
    assert_eq!(all[0].quantity, 4);
    assert_eq!(all[1].name, None);
    assert_eq!(all[1].size, "10");
    assert_eq!(all[1].color, "Red");
    assert_eq!(all[1].created_at, all[1].updated_at);

    let hoodie = repo
        .insert(&NewGarment::new("Hoodie", "L", "Black"))
        .await
        .unwrap();
    assert_eq!(hoodie.id, 4);

    assert!(db.migration_status().await.unwrap().is_current());
    db.close().await;
}

#[tokio::test]
async fn legacy_file_without_quantity_defaults_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garments.db");
    legacy_file(
        &path,
        false,
        "INSERT INTO garments (name, size, color, style) VALUES ('Basic', 'S', 'White', 'Tee');",
    )
    .await;

    let db = Database::open(&path).await.unwrap();
    let tee = db.garments().get(1).await.unwrap();
    assert_eq!(tee.quantity, 0);
    assert_eq!(tee.style, "Tee");

    db.garments().adjust_quantity(1, 3).await.unwrap();
    assert_eq!(db.garments().get(1).await.unwrap().quantity, 3);
    db.close().await;
}

#[tokio::test]
async fn invalid_legacy_row_fails_open_and_keeps_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garments.db");
    legacy_file(
        &path,
        true,
        "INSERT INTO garments (name, size, color, style, quantity) VALUES
            ('Blank', 'M', 'Blue', '   ', 2);",
    )
    .await;

    let err = Database::new(DbConfig::new(&path).exclusive(false))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::MigrationFailed(_)), "unexpected error: {err:?}");
    assert!(err.is_storage());

    let raw = Database::new(DbConfig::new(&path).run_migrations(false).exclusive(false))
        .await
        .unwrap();
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('garments')")
        .fetch_all(raw.pool())
        .await
        .unwrap();
    assert!(!columns.iter().any(|c| c == "created_at"));
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM garments")
        .fetch_one(raw.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
    raw.close().await;
}

//! Creating wines: duplicate detection, the bootstrap movement, and the
//! non-atomic failure mode in between.

use cellarman::schema::{transactions, wines};
use cellarman::{CellValue, CellarError, NewWine, SheetStore, INITIAL_STOCK_REASON};

use crate::support::{catalog, seeded_store, BAROLO};

#[test]
fn adds_a_wine_without_stock() {
    let store = seeded_store();
    let catalog = catalog(store.clone());

    let mut new_wine = NewWine::new("Sancerre", "Vacheron");
    new_wine.vintage = CellValue::from(2022_i64);
    new_wine.color = CellValue::from("White");
    let added = catalog.add_wine(&new_wine).unwrap();

    assert!(added.wine_id.starts_with("W-"));
    assert_eq!(added.name, "Sancerre");
    assert_eq!(added.winery, "Vacheron");
    assert_eq!(added.initial_transaction_id, None);

    let table = store.read_all(wines::SHEET).unwrap();
    assert_eq!(table.rows.len(), 2);
    let row = table.rows.last().unwrap();
    assert_eq!(row[wines::COL_WINE_ID], CellValue::from(added.wine_id.as_str()));
    assert_eq!(row[wines::COL_VINTAGE], CellValue::from(2022_i64));
    assert_eq!(row[wines::COL_COLOR], CellValue::from("White"));

    // No bootstrap quantity, no movement.
    assert!(store.read_all(transactions::SHEET).unwrap().is_empty());
}

#[test]
fn trims_name_and_winery() {
    let catalog = catalog(seeded_store());

    let added = catalog
        .add_wine(&NewWine::new("  Sancerre ", " Vacheron  "))
        .unwrap();

    assert_eq!(added.name, "Sancerre");
    assert_eq!(added.winery, "Vacheron");
}

#[test]
fn requires_name_and_winery() {
    let catalog = catalog(seeded_store());

    for new_wine in [
        NewWine::new("", "Vacheron"),
        NewWine::new("Sancerre", "   "),
        NewWine::new(CellValue::Empty, CellValue::Empty),
    ] {
        assert_eq!(
            catalog.add_wine(&new_wine).unwrap_err(),
            CellarError::Validation("Missing required fields: name, winery".to_string())
        );
    }
}

#[test]
fn duplicate_pair_is_a_conflict_and_appends_nothing() {
    let store = seeded_store();
    let catalog = catalog(store.clone());

    // Case differs, the (name, winery) pair does not.
    let err = catalog
        .add_wine(&NewWine::new("BAROLO riserva", "conterno"))
        .unwrap_err();

    assert_eq!(
        err,
        CellarError::DuplicateWine {
            existing_wine_id: BAROLO.to_string()
        }
    );
    assert_eq!(store.read_all(wines::SHEET).unwrap().rows.len(), 1);
}

#[test]
fn same_name_at_a_different_winery_is_fine() {
    let catalog = catalog(seeded_store());

    let added = catalog
        .add_wine(&NewWine::new("Barolo Riserva", "Vietti"))
        .unwrap();

    assert_eq!(added.name, "Barolo Riserva");
}

#[test]
fn initial_quantity_creates_exactly_one_in_movement() {
    let store = seeded_store();
    let catalog = catalog(store.clone());

    let mut new_wine = NewWine::new("Sancerre", "Vacheron");
    new_wine.initial_quantity = CellValue::from(12.0);
    let added = catalog.add_wine(&new_wine).unwrap();

    let transaction_id = added.initial_transaction_id.expect("bootstrap movement");
    assert!(transaction_id.starts_with("TX-"));

    let table = store.read_all(transactions::SHEET).unwrap();
    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(
        row[transactions::COL_WINE_ID],
        CellValue::from(added.wine_id.as_str())
    );
    assert_eq!(row[transactions::COL_TYPE], CellValue::from("IN"));
    assert_eq!(row[transactions::COL_QUANTITY], CellValue::from(12.0));
    assert_eq!(
        row[transactions::COL_REASON],
        CellValue::from(INITIAL_STOCK_REASON)
    );
    assert_eq!(row[transactions::COL_DATE], CellValue::from("2024-06-01"));
}

#[test]
fn bootstrap_metadata_is_carried_through() {
    let store = seeded_store();
    let catalog = catalog(store.clone());

    let mut new_wine = NewWine::new("Sancerre", "Vacheron");
    new_wine.initial_quantity = CellValue::from("6");
    new_wine.initial_transaction_date = CellValue::from("2024-03-15");
    new_wine.initial_reason = CellValue::from("Cellar move");
    new_wine.initial_person = CellValue::from("Marta");
    catalog.add_wine(&new_wine).unwrap();

    let table = store.read_all(transactions::SHEET).unwrap();
    let row = &table.rows[0];
    assert_eq!(row[transactions::COL_QUANTITY], CellValue::from(6.0));
    assert_eq!(row[transactions::COL_DATE], CellValue::from("2024-03-15"));
    assert_eq!(row[transactions::COL_REASON], CellValue::from("Cellar move"));
    assert_eq!(row[transactions::COL_PERSON], CellValue::from("Marta"));
}

#[test]
fn bad_initial_quantity_leaves_the_wine_without_stock() {
    let store = seeded_store();
    let catalog = catalog(store.clone());

    let mut new_wine = NewWine::new("Sancerre", "Vacheron");
    new_wine.initial_quantity = CellValue::from(-3.0);
    let err = catalog.add_wine(&new_wine).unwrap_err();

    assert_eq!(
        err,
        CellarError::Validation("initialQuantity must be a positive number".to_string())
    );
    // The wine row was already appended when the quantity was checked.
    let table = store.read_all(wines::SHEET).unwrap();
    assert_eq!(table.rows.len(), 2);
    assert!(store.read_all(transactions::SHEET).unwrap().is_empty());
}

#[test]
fn bad_initial_date_also_leaves_the_wine_in_place() {
    let store = seeded_store();
    let catalog = catalog(store.clone());

    let mut new_wine = NewWine::new("Sancerre", "Vacheron");
    new_wine.initial_quantity = CellValue::from(6.0);
    new_wine.initial_transaction_date = CellValue::from("15/03/2024");
    let err = catalog.add_wine(&new_wine).unwrap_err();

    assert_eq!(
        err,
        CellarError::Validation(
            "initialTransactionDate must be in format YYYY-MM-DD".to_string()
        )
    );
    assert_eq!(store.read_all(wines::SHEET).unwrap().rows.len(), 2);
    assert!(store.read_all(transactions::SHEET).unwrap().is_empty());
}

#[test]
fn zero_initial_quantity_is_rejected() {
    let catalog = catalog(seeded_store());

    let mut new_wine = NewWine::new("Sancerre", "Vacheron");
    new_wine.initial_quantity = CellValue::from(0.0);

    assert_eq!(
        catalog.add_wine(&new_wine).unwrap_err(),
        CellarError::Validation("initialQuantity must be a positive number".to_string())
    );
}

//! The merged inventory view: inventory rows drive the listing, catalog
//! metadata fills in around them.

use serde_json::{json, Value};

use cellarman::schema::{inventory, wines};
use cellarman::{CellValue, CellarError, InMemorySheetStore, Inventory, SheetStore};

use crate::support::{inventory_row, seeded_store, wine_row, BAROLO, SANCERRE};

#[test]
fn inventory_fields_override_catalog_fields() {
    let view = Inventory::new(seeded_store());

    let items = view.merged().unwrap();
    assert_eq!(items.len(), 1);
    let item = &items[0];

    // Shared keys take the inventory row's value, even when that value is
    // empty; catalog-only keys survive the merge.
    assert_eq!(item["WineID"], json!(BAROLO));
    assert_eq!(item["Name"], json!("Barolo Riserva DOCG"));
    assert_eq!(item["Winery"], Value::Null);
    assert_eq!(item["Vintage"], Value::Null);
    assert_eq!(item["Region"], json!("Piedmont"));
    assert_eq!(item["Grapes"], json!("Nebbiolo"));
    assert_eq!(item["CurrentStock"], json!(5));
}

#[test]
fn wines_without_an_inventory_row_are_omitted() {
    let view = Inventory::new(seeded_store());

    let items = view.merged().unwrap();
    assert!(items.iter().all(|item| item["WineID"] != json!(SANCERRE)));
}

#[test]
fn inventory_rows_without_a_catalog_match_still_appear() {
    let store = seeded_store();
    store
        .append_row(inventory::SHEET, inventory_row("W-GHOST", "Mystery Red", 1.0))
        .unwrap();

    let items = Inventory::new(store).merged().unwrap();
    assert_eq!(items.len(), 2);
    let ghost = items.iter().find(|i| i["WineID"] == json!("W-GHOST")).unwrap();
    assert_eq!(ghost["Name"], json!("Mystery Red"));
    // No catalog row, so no catalog-only keys.
    assert!(ghost.get("Region").is_none());
}

#[test]
fn wine_id_is_forced_to_the_trimmed_inventory_identifier() {
    let store = seeded_store();
    store
        .append_row(
            inventory::SHEET,
            inventory_row(&format!("  {SANCERRE} "), "Sancerre", 3.0),
        )
        .unwrap();

    let items = Inventory::new(store).merged().unwrap();
    let item = items.iter().find(|i| i["WineID"] == json!(SANCERRE)).unwrap();
    // The padded identifier still joined against the catalog.
    assert_eq!(item["Region"], json!("Piedmont"));
}

#[test]
fn blank_inventory_ids_are_skipped() {
    let store = seeded_store();
    store
        .append_row(inventory::SHEET, inventory_row("   ", "No id", 9.0))
        .unwrap();

    assert_eq!(Inventory::new(store).merged().unwrap().len(), 1);
}

#[test]
fn empty_inventory_yields_an_empty_list() {
    let store = seeded_store();
    store.insert_sheet(inventory::SHEET, &inventory::HEADER, vec![]);

    assert_eq!(Inventory::new(store).merged().unwrap(), vec![]);
}

#[test]
fn missing_inventory_sheet_is_not_found() {
    let store = std::sync::Arc::new(InMemorySheetStore::new().with_sheet(
        wines::SHEET,
        &wines::HEADER,
        vec![wine_row(BAROLO, "Barolo Riserva", "Conterno", 2016)],
    ));

    assert_eq!(
        Inventory::new(store).merged().unwrap_err(),
        CellarError::NotFound("Sheet not found: Inventory".to_string())
    );
}

#[test]
fn populated_inventory_with_empty_wines_is_an_integrity_error() {
    let store = seeded_store();
    store.insert_sheet(wines::SHEET, &wines::HEADER, vec![]);

    assert_eq!(
        Inventory::new(store).merged().unwrap_err(),
        CellarError::Integrity("Wines sheet is empty or missing".to_string())
    );
}

#[test]
fn populated_inventory_with_no_wines_sheet_is_an_integrity_error() {
    let store = std::sync::Arc::new(InMemorySheetStore::new().with_sheet(
        inventory::SHEET,
        &inventory::HEADER,
        vec![inventory_row(BAROLO, "Barolo Riserva", 5.0)],
    ));

    assert_eq!(
        Inventory::new(store).merged().unwrap_err(),
        CellarError::Integrity("Wines sheet is empty or missing".to_string())
    );
}

#[test]
fn header_without_wine_id_is_an_integrity_error() {
    let store = std::sync::Arc::new(
        InMemorySheetStore::new()
            .with_sheet(
                wines::SHEET,
                &["Id", "Name"],
                vec![vec![CellValue::from("W-1"), CellValue::from("Barolo")]],
            )
            .with_sheet(
                inventory::SHEET,
                &inventory::HEADER,
                vec![inventory_row("W-1", "Barolo", 2.0)],
            ),
    );

    assert_eq!(
        Inventory::new(store).merged().unwrap_err(),
        CellarError::Integrity("Wines header missing \"WineID\"".to_string())
    );
}

#[test]
fn summary_keeps_only_the_reduced_key_set() {
    let view = Inventory::new(seeded_store());

    let items = view.summary().unwrap();
    assert_eq!(items.len(), 1);
    let item = &items[0];

    assert_eq!(item.len(), 5);
    assert_eq!(item["WineID"], json!(BAROLO));
    assert_eq!(item["Name"], json!("Barolo Riserva DOCG"));
    assert_eq!(item["CurrentStock"], json!(5));
    assert!(item.get("Region").is_none());
    assert!(item.get("StorageLocation").is_none());
}

//! End-to-end action flows through `CellarService::handle`.

use serde_json::json;

use crate::support::{query, seeded_store, service, BAROLO, TOKEN};

#[test]
fn list_inventory_carries_items_and_stats() {
    let service = service(seeded_store());

    let envelope = service.handle("GET", &query(&[("action", "listInventory")]), None);

    assert!(envelope.is_success());
    assert_eq!(envelope.code(), 200);
    let data = envelope.data().unwrap();
    assert_eq!(data["total"], json!(1));
    assert_eq!(data["items"][0]["WineID"], json!(BAROLO));
    assert_eq!(data["items"][0]["CurrentStock"], json!(6));
    assert_eq!(data["stats"]["TotalBottles"], json!(6));
}

#[test]
fn list_inventory_summary_reduces_the_items() {
    let service = service(seeded_store());

    let envelope = service.handle("GET", &query(&[("action", "listInventorySummary")]), None);

    assert!(envelope.is_success());
    let data = envelope.data().unwrap();
    assert_eq!(data["total"], json!(1));
    let item = data["items"][0].as_object().unwrap();
    assert!(item.contains_key("WineID"));
    assert!(item.contains_key("CurrentStock"));
    assert!(!item.contains_key("StorageLocation"));
    // The summary has no stats block.
    assert!(data.get("stats").is_none());
}

#[test]
fn broken_statistics_degrade_without_failing_the_listing() {
    use cellarman::schema::{inventory, transactions, wines};

    // No Statistics sheet at all.
    let store = std::sync::Arc::new(
        cellarman::InMemorySheetStore::new()
            .with_sheet(
                wines::SHEET,
                &wines::HEADER,
                vec![crate::support::wine_row(BAROLO, "Barolo Riserva", "Conterno")],
            )
            .with_sheet(
                transactions::SHEET,
                &transactions::HEADER,
                vec![crate::support::movement(BAROLO, 6.0, "IN")],
            )
            .with_sheet(
                inventory::SHEET,
                &inventory::HEADER,
                vec![crate::support::inventory_row(BAROLO, 6.0)],
            ),
    );
    let service = service(store);

    let envelope = service.handle("GET", &query(&[("action", "listInventory")]), None);

    assert!(envelope.is_success());
    let data = envelope.data().unwrap();
    assert_eq!(data["total"], json!(1));
    assert_eq!(data["stats"]["_error"], json!("Failed to read statistics"));
}

#[test]
fn add_wine_then_withdraw_then_oversell() {
    let service = service(seeded_store());

    // Create a wine with bootstrap stock.
    let body = json!({
        "name": "Sancerre",
        "winery": "Vacheron",
        "initialQuantity": 2
    })
    .to_string();
    let envelope = service.handle(
        "POST",
        &query(&[("action", "addWine")]),
        Some(body.as_str()),
    );
    assert!(envelope.is_success());
    let data = envelope.data().unwrap();
    let wine_id = data["wineId"].as_str().unwrap().to_string();
    assert!(wine_id.starts_with("W-"));
    assert!(data["initialTransactionId"].as_str().unwrap().starts_with("TX-"));

    // Withdraw both bottles.
    let body = json!({
        "wineId": wine_id,
        "type": "out",
        "quantity": 2
    })
    .to_string();
    let envelope = service.handle(
        "POST",
        &query(&[("action", "addTransaction")]),
        Some(body.as_str()),
    );
    assert!(envelope.is_success());
    let data = envelope.data().unwrap();
    assert_eq!(data["type"], json!("OUT"));
    assert_eq!(data["quantity"], json!(2));
    assert_eq!(data["transactionDate"], json!("2024-06-01"));

    // The third bottle does not exist.
    let body = json!({
        "wineId": wine_id,
        "type": "OUT",
        "quantity": 1
    })
    .to_string();
    let envelope = service.handle(
        "POST",
        &query(&[("action", "addTransaction")]),
        Some(body.as_str()),
    );
    assert!(!envelope.is_success());
    assert_eq!(envelope.code(), 409);
    assert_eq!(envelope.error(), Some("Insufficient stock"));
    let body = envelope.body();
    assert_eq!(body["data"]["wineId"], json!(wine_id));
    assert_eq!(body["data"]["requestedOut"], json!(1));
    assert_eq!(body["data"]["currentStock"], json!(0));
}

#[test]
fn duplicate_wine_reports_the_existing_identifier() {
    let service = service(seeded_store());

    let body = json!({ "name": "barolo riserva", "winery": "CONTERNO" }).to_string();
    let envelope = service.handle(
        "POST",
        &query(&[("action", "addWine")]),
        Some(body.as_str()),
    );

    assert_eq!(envelope.code(), 409);
    assert_eq!(envelope.error(), Some("Wine already exists"));
    assert_eq!(envelope.body()["existingWineId"], json!(BAROLO));
}

#[test]
fn update_wine_counts_the_cells_it_wrote() {
    let service = service(seeded_store());

    let body = json!({
        "wineId": BAROLO,
        "vintage": 2016,
        "notes": "Top bottle",
        "storageLocation": null
    })
    .to_string();
    let envelope = service.handle(
        "POST",
        &query(&[("action", "updateWine")]),
        Some(body.as_str()),
    );

    assert!(envelope.is_success());
    let data = envelope.data().unwrap();
    assert_eq!(data["wineId"], json!(BAROLO));
    assert_eq!(data["updatedFields"], json!(3));
}

#[test]
fn unknown_wine_is_a_semantic_404() {
    let service = service(seeded_store());

    let body = json!({ "wineId": "W-NOPE", "type": "IN", "quantity": 1 }).to_string();
    let envelope = service.handle(
        "POST",
        &query(&[("action", "addTransaction")]),
        Some(body.as_str()),
    );

    assert_eq!(envelope.code(), 404);
    assert_eq!(envelope.error(), Some("Wine not found"));
    assert_eq!(envelope.body()["wineId"], json!("W-NOPE"));
}

#[test]
fn validation_failures_carry_the_message() {
    let service = service(seeded_store());

    let body = json!({ "wineId": BAROLO, "type": "IN" }).to_string();
    let envelope = service.handle(
        "POST",
        &query(&[("action", "addTransaction")]),
        Some(body.as_str()),
    );

    assert_eq!(envelope.code(), 400);
    assert_eq!(envelope.error(), Some("Missing required field: quantity"));
}

#[test]
fn action_can_come_from_the_body() {
    let service = service(seeded_store());

    let body = json!({ "action": "ping" }).to_string();
    let envelope = service.handle("POST", &query(&[]), Some(body.as_str()));

    assert!(envelope.is_success());
    assert_eq!(envelope.data().unwrap()["method"], json!("POST"));
}

#[test]
fn token_can_come_from_the_body() {
    let service = service(seeded_store());

    let mut no_token = query(&[("action", "ping")]);
    no_token.remove("token");
    let body = json!({ "token": TOKEN }).to_string();
    let envelope = service.handle("POST", &no_token, Some(body.as_str()));

    assert!(envelope.is_success());
}

#[test]
fn wrong_token_is_unauthorized_with_a_200_transport() {
    let service = service(seeded_store());

    let mut bad = query(&[("action", "listInventory")]);
    bad.insert("token".to_string(), "wrong".to_string());
    let envelope = service.handle("GET", &bad, None);

    assert!(!envelope.is_success());
    assert_eq!(envelope.code(), 401);
    assert_eq!(envelope.error(), Some("Unauthorized"));
}

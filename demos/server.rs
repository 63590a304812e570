//! Runs the cellar service over HTTP against an in-memory store.
//!
//! ```sh
//! cargo run --example server --features http
//! curl 'http://localhost:3000/?action=listInventory&token=dev-token'
//! ```

use std::sync::Arc;

use cellarman::schema;
use cellarman::{CellValue, CellarService, InMemorySheetStore, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt().init();

    // Seed a small cellar so the read actions have something to show.
    let store = InMemorySheetStore::new();
    store.insert_sheet(
        schema::wines::SHEET,
        &schema::wines::HEADER,
        vec![
            wine_row("W-20240101-120000-AB12CD", "Barolo Riserva", "Conterno", 2016),
            wine_row("W-20240102-090000-EF34AB", "Sancerre", "Vacheron", 2022),
        ],
    );
    store.insert_sheet(
        schema::transactions::SHEET,
        &schema::transactions::HEADER,
        vec![
            movement("TX-20240103-100000-0001AA", "W-20240101-120000-AB12CD", 6.0, "IN"),
            movement("TX-20240104-100000-0002BB", "W-20240101-120000-AB12CD", 1.0, "OUT"),
            movement("TX-20240105-100000-0003CC", "W-20240102-090000-EF34AB", 12.0, "IN"),
        ],
    );
    store.insert_sheet(
        schema::inventory::SHEET,
        &schema::inventory::HEADER,
        vec![
            inventory_row("W-20240101-120000-AB12CD", 5.0, "Cellar A3"),
            inventory_row("W-20240102-090000-EF34AB", 12.0, "Fridge"),
        ],
    );
    store.insert_sheet(
        schema::statistics::SHEET,
        &schema::statistics::HEADER,
        vec![
            stat("TotalBottles", CellValue::from(17.0)),
            stat("DistinctWines", CellValue::from(2.0)),
            stat("LastStocktake", CellValue::from("2024-01-05")),
        ],
    );

    let token = std::env::var("CELLARMAN_TOKEN").unwrap_or_else(|_| "dev-token".to_string());
    let service = CellarService::new(Arc::new(store), ServiceConfig::with_token(token));

    cellarman::service::serve(Arc::new(service), "0.0.0.0:3000").await
}

fn wine_row(wine_id: &str, name: &str, winery: &str, vintage: i64) -> Vec<CellValue> {
    let mut row = vec![CellValue::Empty; schema::wines::HEADER.len()];
    row[schema::wines::COL_WINE_ID] = CellValue::from(wine_id);
    row[schema::wines::COL_NAME] = CellValue::from(name);
    row[schema::wines::COL_WINERY] = CellValue::from(winery);
    row[schema::wines::COL_VINTAGE] = CellValue::from(vintage);
    row
}

fn movement(id: &str, wine_id: &str, quantity: f64, kind: &str) -> Vec<CellValue> {
    vec![
        CellValue::from(id),
        CellValue::from("2024-01-05"),
        CellValue::from(wine_id),
        CellValue::from(quantity),
        CellValue::from(kind),
        CellValue::from("Seed data"),
        CellValue::Empty,
        CellValue::Empty,
    ]
}

fn inventory_row(wine_id: &str, stock: f64, location: &str) -> Vec<CellValue> {
    vec![
        CellValue::from(wine_id),
        CellValue::Empty,
        CellValue::Empty,
        CellValue::Empty,
        CellValue::Empty,
        CellValue::from(location),
        CellValue::from(stock),
        CellValue::from("2024-01-05"),
        CellValue::from(true),
        CellValue::from(false),
    ]
}

fn stat(key: &str, value: CellValue) -> Vec<CellValue> {
    vec![CellValue::from(key), value, CellValue::Empty]
}

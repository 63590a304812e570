//! Read-side projection joining catalog metadata with inventory state.
//!
//! The Inventory sheet is maintained outside this crate (derived columns,
//! typically formulas in the store host); this module only reads it. The
//! projection is driven by Inventory rows: wines without an inventory row
//! are omitted, inventory rows without a catalog match still appear.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{CellarError, Result};
use crate::schema::{inventory, wines};
use crate::sheet::{cell, SheetError, SheetStore, Table};
use crate::value::CellValue;

/// Keys kept by [`Inventory::summary`].
const SUMMARY_KEYS: [&str; 5] = ["WineID", "Name", "Winery", "Vintage", "CurrentStock"];

/// Pure reader over the Wines and Inventory sheets.
pub struct Inventory<S> {
    store: Arc<S>,
}

impl<S> Clone for Inventory<S> {
    fn clone(&self) -> Self {
        Inventory {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SheetStore> Inventory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Inventory { store }
    }

    /// Merged per-wine items, keyed by the sheet header names.
    ///
    /// Catalog fields come first, inventory fields override on collision,
    /// and `WineID` is forced to the inventory row's identifier. An empty
    /// inventory yields an empty list; a non-empty inventory with a
    /// missing or empty Wines sheet is a data-integrity error, since those
    /// rows necessarily reference catalog metadata.
    pub fn merged(&self) -> Result<Vec<Map<String, Value>>> {
        let inv = self.store.read_all(inventory::SHEET)?;
        if inv.is_empty() {
            return Ok(Vec::new());
        }

        let catalog = match self.store.read_all(wines::SHEET) {
            Ok(table) if !table.is_empty() => table,
            Ok(_) | Err(SheetError::SheetNotFound(_)) => {
                return Err(CellarError::Integrity(
                    "Wines sheet is empty or missing".to_string(),
                ))
            }
            Err(err) => return Err(err.into()),
        };

        let wine_id_col = catalog.column("WineID").ok_or_else(|| {
            CellarError::Integrity("Wines header missing \"WineID\"".to_string())
        })?;

        let mut wines_by_id: HashMap<String, Map<String, Value>> = HashMap::new();
        for row in &catalog.rows {
            let id = cell(row, wine_id_col).to_text().trim().to_string();
            if id.is_empty() {
                continue;
            }
            wines_by_id.insert(id, row_to_object(&catalog, row));
        }

        let inv_id_col = inv.column("WineID").ok_or_else(|| {
            CellarError::Integrity("Inventory header missing \"WineID\"".to_string())
        })?;

        let mut items = Vec::new();
        for row in &inv.rows {
            let id = cell(row, inv_id_col).to_text().trim().to_string();
            if id.is_empty() {
                continue;
            }

            let mut merged = wines_by_id.get(&id).cloned().unwrap_or_default();
            for (key, value) in row_to_object(&inv, row) {
                merged.insert(key, value);
            }
            merged.insert("WineID".to_string(), Value::String(id));
            items.push(merged);
        }

        Ok(items)
    }

    /// The same merge reduced to identifier, name, winery, vintage and
    /// current stock.
    pub fn summary(&self) -> Result<Vec<Map<String, Value>>> {
        let items = self.merged()?;
        Ok(items
            .into_iter()
            .map(|item| {
                let mut reduced = Map::new();
                for key in SUMMARY_KEYS {
                    if let Some(value) = item.get(key) {
                        reduced.insert(key.to_string(), value.clone());
                    }
                }
                reduced
            })
            .collect())
    }
}

/// One sheet row as a JSON object keyed by trimmed header names. Blank
/// header names are skipped.
fn row_to_object(table: &Table, row: &[CellValue]) -> Map<String, Value> {
    let mut object = Map::new();
    for (i, name) in table.header.iter().enumerate() {
        let key = name.trim();
        if key.is_empty() {
            continue;
        }
        object.insert(key.to_string(), cell(row, i).to_json());
    }
    object
}

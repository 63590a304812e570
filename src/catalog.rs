//! The wine catalog: one row of metadata per distinct wine.
//!
//! Rows are created by [`Catalog::add_wine`] and mutated cell-by-cell by
//! [`Catalog::update_wine`]; nothing here ever deletes. The duplicate
//! check, the row append and the optional bootstrap movement run as one
//! critical section under the cellar lock.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::clock::Clock;
use crate::error::{CellarError, Result};
use crate::ids;
use crate::ledger::Ledger;
use crate::lock::{LockGuard, LockManager};
use crate::schema::{wines, CELLAR_LOCK};
use crate::sheet::{cell, SheetStore};
use crate::value::CellValue;

/// Payload for creating a wine. Only `name` and `winery` are required;
/// every other field defaults to an empty cell. The `initial*` fields
/// describe an optional bootstrap `IN` movement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewWine {
    pub name: CellValue,
    pub winery: CellValue,
    pub region: CellValue,
    pub country: CellValue,
    pub vintage: CellValue,
    pub color: CellValue,
    pub grapes: CellValue,
    pub style: CellValue,
    pub sweetness: CellValue,
    pub alcohol: CellValue,
    pub drink_from: CellValue,
    pub drink_until: CellValue,
    pub food_pairing: CellValue,
    pub occasion: CellValue,
    pub price: CellValue,
    pub bottle_size: CellValue,
    pub storage_location: CellValue,
    pub notes: CellValue,
    pub initial_quantity: CellValue,
    pub initial_transaction_date: CellValue,
    pub initial_reason: CellValue,
    pub initial_person: CellValue,
    pub initial_comment: CellValue,
}

impl NewWine {
    /// Shorthand for the required fields; everything else starts blank.
    pub fn new(name: impl Into<CellValue>, winery: impl Into<CellValue>) -> Self {
        NewWine {
            name: name.into(),
            winery: winery.into(),
            ..Default::default()
        }
    }
}

/// Result of a successful [`Catalog::add_wine`].
#[derive(Debug, Clone, PartialEq)]
pub struct AddedWine {
    pub wine_id: String,
    pub name: String,
    pub winery: String,
    /// Identifier of the bootstrap movement, when one was requested.
    pub initial_transaction_id: Option<String>,
}

/// Deserialize a field that was present in the payload, keeping `null` as
/// an explicit empty cell. Missing fields never reach this and stay `None`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<CellValue>, D::Error>
where
    D: Deserializer<'de>,
{
    CellValue::deserialize(deserializer).map(Some)
}

/// Partial update for a wine row.
///
/// Each field is tri-state: `None` means not supplied, `Some(Empty)` means
/// supplied as `null`, `Some(value)` otherwise. Presence decides whether a
/// cell is written, so an explicit empty string still clears its cell.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WineUpdate {
    pub wine_id: CellValue,
    #[serde(deserialize_with = "present")]
    pub name: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub winery: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub region: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub country: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub vintage: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub color: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub grapes: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub style: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub sweetness: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub alcohol: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub drink_from: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub drink_until: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub food_pairing: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub occasion: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub price: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub bottle_size: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub storage_location: Option<CellValue>,
    #[serde(deserialize_with = "present")]
    pub notes: Option<CellValue>,
}

impl WineUpdate {
    pub fn for_wine(wine_id: impl Into<CellValue>) -> Self {
        WineUpdate {
            wine_id: wine_id.into(),
            ..Default::default()
        }
    }

    /// The sparse (column, value) set to apply, in column order.
    fn changes(&self) -> Vec<(usize, CellValue)> {
        let fields: [(usize, &Option<CellValue>); 18] = [
            (wines::COL_NAME, &self.name),
            (wines::COL_WINERY, &self.winery),
            (wines::COL_REGION, &self.region),
            (wines::COL_COUNTRY, &self.country),
            (wines::COL_VINTAGE, &self.vintage),
            (wines::COL_COLOR, &self.color),
            (wines::COL_GRAPES, &self.grapes),
            (wines::COL_STYLE, &self.style),
            (wines::COL_SWEETNESS, &self.sweetness),
            (wines::COL_ALCOHOL, &self.alcohol),
            (wines::COL_DRINK_FROM, &self.drink_from),
            (wines::COL_DRINK_UNTIL, &self.drink_until),
            (wines::COL_FOOD_PAIRING, &self.food_pairing),
            (wines::COL_OCCASION, &self.occasion),
            (wines::COL_PRICE, &self.price),
            (wines::COL_BOTTLE_SIZE, &self.bottle_size),
            (wines::COL_STORAGE_LOCATION, &self.storage_location),
            (wines::COL_NOTES, &self.notes),
        ];
        fields
            .iter()
            .filter_map(|(col, value)| value.as_ref().map(|v| (*col, v.clone())))
            .collect()
    }
}

/// Result of a successful [`Catalog::update_wine`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedWine {
    pub wine_id: String,
    pub updated_fields: usize,
}

/// Sole writer of the Wines sheet.
pub struct Catalog<S> {
    store: Arc<S>,
    locks: Arc<dyn LockManager>,
    clock: Arc<dyn Clock>,
    lock_wait: Duration,
    ledger: Ledger<S>,
}

impl<S> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Catalog {
            store: Arc::clone(&self.store),
            locks: Arc::clone(&self.locks),
            clock: Arc::clone(&self.clock),
            lock_wait: self.lock_wait,
            ledger: self.ledger.clone(),
        }
    }
}

impl<S: SheetStore> Catalog<S> {
    pub fn new(
        store: Arc<S>,
        locks: Arc<dyn LockManager>,
        clock: Arc<dyn Clock>,
        lock_wait: Duration,
    ) -> Self {
        let ledger = Ledger::new(
            Arc::clone(&store),
            Arc::clone(&locks),
            Arc::clone(&clock),
            lock_wait,
        );
        Catalog {
            store,
            locks,
            clock,
            lock_wait,
            ledger,
        }
    }

    /// Create a wine row, optionally with a bootstrap `IN` movement.
    ///
    /// The duplicate check is a full-table case-insensitive scan on the
    /// (name, winery) pair. The whole sequence runs under the cellar lock.
    ///
    /// Known gap, kept as observed behavior: the bootstrap quantity is
    /// validated only after the wine row has been appended, so a bad
    /// `initialQuantity` leaves the new wine in place with no movement.
    pub fn add_wine(&self, new_wine: &NewWine) -> Result<AddedWine> {
        let name = new_wine.name.to_text().trim().to_string();
        let winery = new_wine.winery.to_text().trim().to_string();
        if name.is_empty() || winery.is_empty() {
            return Err(CellarError::Validation(
                "Missing required fields: name, winery".to_string(),
            ));
        }

        let lock = self.locks.get_lock(CELLAR_LOCK)?;
        let _guard = LockGuard::acquire(lock, self.lock_wait)?;

        let table = self.store.read_all(wines::SHEET)?;
        for row in &table.rows {
            let row_name = cell(row, wines::COL_NAME).to_text();
            let row_winery = cell(row, wines::COL_WINERY).to_text();
            if row_name.to_lowercase() == name.to_lowercase()
                && row_winery.to_lowercase() == winery.to_lowercase()
            {
                return Err(CellarError::DuplicateWine {
                    existing_wine_id: cell(row, wines::COL_WINE_ID).to_text(),
                });
            }
        }

        let wine_id = ids::wine_id(self.clock.now());
        self.store
            .append_row(wines::SHEET, self.build_row(&wine_id, &name, &winery, new_wine))?;

        let mut initial_transaction_id = None;
        if !new_wine.initial_quantity.is_unset() {
            let quantity = match new_wine.initial_quantity.to_number() {
                Some(q) if q > 0.0 => q,
                _ => {
                    return Err(CellarError::Validation(
                        "initialQuantity must be a positive number".to_string(),
                    ))
                }
            };
            let transaction_id = self.ledger.append_initial_stock(
                &wine_id,
                quantity,
                &new_wine.initial_transaction_date,
                &new_wine.initial_reason,
                &new_wine.initial_person,
                &new_wine.initial_comment,
            )?;
            initial_transaction_id = Some(transaction_id);
        }

        Ok(AddedWine {
            wine_id,
            name,
            winery,
            initial_transaction_id,
        })
    }

    /// Apply a sparse update to an existing wine row, returning how many
    /// cells were written. The cell writes are independent; there is no
    /// rollback if a later one fails.
    pub fn update_wine(&self, update: &WineUpdate) -> Result<UpdatedWine> {
        if update.wine_id.is_unset() {
            return Err(CellarError::Validation(
                "Missing required field: wineId".to_string(),
            ));
        }
        let wine_id = update.wine_id.to_text().trim().to_string();

        let table = self.store.read_all(wines::SHEET)?;
        if table.is_empty() {
            return Err(CellarError::NotFound("Wines sheet is empty".to_string()));
        }

        let row_index = table
            .rows
            .iter()
            .position(|row| cell(row, wines::COL_WINE_ID).to_text() == wine_id)
            .ok_or(CellarError::WineNotFound {
                wine_id: wine_id.clone(),
            })?;

        let changes = update.changes();
        if changes.is_empty() {
            return Err(CellarError::Validation(
                "No updatable fields provided".to_string(),
            ));
        }

        let updated_fields = changes.len();
        for (col, value) in changes {
            self.store.write_cell(wines::SHEET, row_index, col, value)?;
        }

        Ok(UpdatedWine {
            wine_id,
            updated_fields,
        })
    }

    fn build_row(&self, wine_id: &str, name: &str, winery: &str, w: &NewWine) -> Vec<CellValue> {
        vec![
            CellValue::from(wine_id),
            CellValue::from(name),
            CellValue::from(winery),
            w.region.clone(),
            w.country.clone(),
            w.vintage.clone(),
            w.color.clone(),
            w.grapes.clone(),
            w.style.clone(),
            w.sweetness.clone(),
            w.alcohol.clone(),
            w.drink_from.clone(),
            w.drink_until.clone(),
            w.food_pairing.clone(),
            w.occasion.clone(),
            w.price.clone(),
            w.bottle_size.clone(),
            w.storage_location.clone(),
            w.notes.clone(),
        ]
    }
}

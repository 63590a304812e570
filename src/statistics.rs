//! Reader for the precomputed key/value Statistics sheet.
//!
//! The sheet is a plain Key / Value / Comment table maintained outside
//! this crate. Values are typed on the way out: empty becomes `null`,
//! numbers and booleans pass through, date cells become ISO-8601 strings,
//! everything else is coerced to a string.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::schema::statistics;
use crate::sheet::{cell, SheetStore};
use crate::value::CellValue;

pub struct Statistics<S> {
    store: Arc<S>,
}

impl<S> Clone for Statistics<S> {
    fn clone(&self) -> Self {
        Statistics {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SheetStore> Statistics<S> {
    pub fn new(store: Arc<S>) -> Self {
        Statistics { store }
    }

    /// Read the sheet into a flat typed map. Rows whose key is blank after
    /// trimming are skipped; the comment column is ignored.
    pub fn read(&self) -> Result<Map<String, Value>> {
        let table = self.store.read_all(statistics::SHEET)?;

        let mut stats = Map::new();
        for row in &table.rows {
            let key = cell(row, statistics::COL_KEY).to_text().trim().to_string();
            if key.is_empty() {
                continue;
            }
            stats.insert(key, typed_value(cell(row, statistics::COL_VALUE)));
        }
        Ok(stats)
    }

    /// Read the sheet, degrading to an error-flagged stub map on failure.
    ///
    /// The inventory listing carries statistics opportunistically; a broken
    /// Statistics sheet must not fail that whole response.
    pub fn read_or_stub(&self) -> Map<String, Value> {
        match self.read() {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(error = %err, "statistics read failed, returning stub");
                let mut stub = Map::new();
                stub.insert(
                    "_error".to_string(),
                    Value::String("Failed to read statistics".to_string()),
                );
                stub.insert("_details".to_string(), Value::String(err.to_string()));
                stub
            }
        }
    }
}

/// Typing policy for a value cell. Strictly empty text maps to `null`
/// (whitespace-only text stays text); everything else follows the cell's
/// own JSON mapping.
fn typed_value(value: &CellValue) -> Value {
    match value {
        CellValue::Empty => Value::Null,
        CellValue::Text(s) if s.is_empty() => Value::Null,
        other => other.to_json(),
    }
}

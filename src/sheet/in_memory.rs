//! In-memory sheet store backed by a `HashMap` of tables.
//!
//! The reference `SheetStore` implementation: tests and the demo server
//! seed it with the cellar sheets, engines exercise it exactly as they
//! would a real spreadsheet adapter. Clone-friendly via `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{SheetError, SheetStore, Table};
use crate::value::CellValue;

/// In-memory sheet store. Clones share the same underlying sheets.
#[derive(Clone)]
pub struct InMemorySheetStore {
    sheets: Arc<RwLock<HashMap<String, Table>>>,
}

impl Default for InMemorySheetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySheetStore {
    /// Create a store with no sheets.
    pub fn new() -> Self {
        Self {
            sheets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Builder-style seeding: add a sheet with the given header and rows.
    pub fn with_sheet(self, name: &str, header: &[&str], rows: Vec<Vec<CellValue>>) -> Self {
        self.insert_sheet(name, header, rows);
        self
    }

    /// Add or replace a sheet.
    pub fn insert_sheet(&self, name: &str, header: &[&str], rows: Vec<Vec<CellValue>>) {
        let table = Table::new(header.iter().map(|h| h.to_string()).collect(), rows);
        if let Ok(mut sheets) = self.sheets.write() {
            sheets.insert(name.to_string(), table);
        }
    }
}

impl SheetStore for InMemorySheetStore {
    fn read_all(&self, sheet: &str) -> Result<Table, SheetError> {
        let sheets = self
            .sheets
            .read()
            .map_err(|_| SheetError::Poisoned("read".into()))?;
        sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| SheetError::SheetNotFound(sheet.to_string()))
    }

    fn append_row(&self, sheet: &str, mut cells: Vec<CellValue>) -> Result<(), SheetError> {
        let mut sheets = self
            .sheets
            .write()
            .map_err(|_| SheetError::Poisoned("append".into()))?;
        let table = sheets
            .get_mut(sheet)
            .ok_or_else(|| SheetError::SheetNotFound(sheet.to_string()))?;
        if cells.len() < table.header.len() {
            cells.resize(table.header.len(), CellValue::Empty);
        }
        table.rows.push(cells);
        Ok(())
    }

    fn write_cell(
        &self,
        sheet: &str,
        row: usize,
        col: usize,
        value: CellValue,
    ) -> Result<(), SheetError> {
        let mut sheets = self
            .sheets
            .write()
            .map_err(|_| SheetError::Poisoned("write".into()))?;
        let table = sheets
            .get_mut(sheet)
            .ok_or_else(|| SheetError::SheetNotFound(sheet.to_string()))?;
        if col >= table.header.len() {
            return Err(SheetError::ColumnOutOfBounds {
                sheet: sheet.to_string(),
                column: col,
            });
        }
        let cells = table
            .rows
            .get_mut(row)
            .ok_or_else(|| SheetError::RowOutOfBounds {
                sheet: sheet.to_string(),
                row,
            })?;
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
        Ok(())
    }
}

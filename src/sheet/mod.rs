//! The tabular store port.
//!
//! Everything the engines know about storage is this trait: named sheets,
//! each a header row plus ordered data rows of untyped scalar cells. The
//! store host (typically a hosted spreadsheet) owns the actual grid;
//! `InMemorySheetStore` implements the same contract for tests, the demo
//! server, and embedders.
//!
//! Row indices passed to `write_cell` are 0-based into the *data* rows;
//! the header is not addressable.

mod in_memory;

use std::fmt;

use crate::value::CellValue;

pub use in_memory::InMemorySheetStore;

/// A full sheet read: the header row plus every data row.
///
/// Absent cells read as `CellValue::Empty`; rows may be narrower than the
/// header.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

static EMPTY: CellValue = CellValue::Empty;

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Table { header, rows }
    }

    /// True when the sheet has no data rows (a bare header is still empty).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a column index by header name (trimmed comparison).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }

    /// The cell at (data row, column), `Empty` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }
}

/// The cell at `col` of a single row, `Empty` when the row is too short.
pub fn cell(row: &[CellValue], col: usize) -> &CellValue {
    row.get(col).unwrap_or(&EMPTY)
}

/// Error type for storage-port operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// The named sheet does not exist in the store.
    SheetNotFound(String),
    /// A cell write addressed a data row the sheet does not have.
    RowOutOfBounds { sheet: String, row: usize },
    /// A cell write addressed a column outside the header.
    ColumnOutOfBounds { sheet: String, column: usize },
    /// The store's interior lock was poisoned.
    Poisoned(String),
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::SheetNotFound(name) => write!(f, "sheet not found: {}", name),
            SheetError::RowOutOfBounds { sheet, row } => {
                write!(f, "row {} out of bounds in sheet {}", row, sheet)
            }
            SheetError::ColumnOutOfBounds { sheet, column } => {
                write!(f, "column {} out of bounds in sheet {}", column, sheet)
            }
            SheetError::Poisoned(msg) => write!(f, "sheet store poisoned: {}", msg),
        }
    }
}

impl std::error::Error for SheetError {}

/// Storage engine interface for the three-sheet cellar store.
///
/// Implementations must be shareable across request workers; all mutation
/// here is append-a-row or write-one-cell, the engines build their own
/// consistency on top (see the `lock` module).
pub trait SheetStore: Send + Sync {
    /// Read a whole sheet: header plus ordered data rows.
    fn read_all(&self, sheet: &str) -> Result<Table, SheetError>;

    /// Append one data row. Rows shorter than the header are padded with
    /// empty cells.
    fn append_row(&self, sheet: &str, cells: Vec<CellValue>) -> Result<(), SheetError>;

    /// Overwrite a single cell, addressed by 0-based data row and column.
    fn write_cell(
        &self,
        sheet: &str,
        row: usize,
        col: usize,
        value: CellValue,
    ) -> Result<(), SheetError>;
}

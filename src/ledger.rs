//! The transaction ledger: append-only stock movements.
//!
//! Current stock is never cached here. It is recomputed from the full
//! movement history on every read, so the ledger rows are the single
//! source of truth. The overselling guard (an `OUT` must not drive stock
//! negative) runs inside the cellar lock together with the append, which
//! closes the race where two concurrent withdrawals both observe
//! sufficient stock.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::clock::{is_iso_date, Clock};
use crate::error::{CellarError, Result};
use crate::ids;
use crate::lock::{LockGuard, LockManager};
use crate::schema::{transactions, wines, CELLAR_LOCK};
use crate::sheet::{cell, SheetStore};
use crate::value::CellValue;

/// Movement direction adding to stock.
pub const TYPE_IN: &str = "IN";
/// Movement direction subtracting from stock.
pub const TYPE_OUT: &str = "OUT";
/// Default reason written for a bootstrap movement.
pub const INITIAL_STOCK_REASON: &str = "Initial Stock";

/// A stock movement as it arrives in a request payload.
///
/// Fields are raw cells: absent and `null` both read as `Empty`, so the
/// validation ladder in [`Ledger::record`] sees exactly what the caller
/// supplied. Deserializes from the `addTransaction` payload shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionRequest {
    pub wine_id: CellValue,
    #[serde(rename = "type")]
    pub kind: CellValue,
    pub quantity: CellValue,
    pub transaction_date: CellValue,
    pub reason: CellValue,
    pub person: CellValue,
    pub comment: CellValue,
}

impl TransactionRequest {
    /// Shorthand for the required fields; optional fields start blank.
    pub fn new(
        wine_id: impl Into<CellValue>,
        kind: impl Into<CellValue>,
        quantity: impl Into<CellValue>,
    ) -> Self {
        TransactionRequest {
            wine_id: wine_id.into(),
            kind: kind.into(),
            quantity: quantity.into(),
            ..Default::default()
        }
    }
}

/// A movement accepted into the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTransaction {
    pub transaction_id: String,
    pub wine_id: String,
    pub kind: String,
    pub quantity: f64,
    pub transaction_date: String,
}

/// Sole writer of the Transactions sheet.
pub struct Ledger<S> {
    store: Arc<S>,
    locks: Arc<dyn LockManager>,
    clock: Arc<dyn Clock>,
    lock_wait: Duration,
}

impl<S> Clone for Ledger<S> {
    fn clone(&self) -> Self {
        Ledger {
            store: Arc::clone(&self.store),
            locks: Arc::clone(&self.locks),
            clock: Arc::clone(&self.clock),
            lock_wait: self.lock_wait,
        }
    }
}

impl<S: SheetStore> Ledger<S> {
    pub fn new(
        store: Arc<S>,
        locks: Arc<dyn LockManager>,
        clock: Arc<dyn Clock>,
        lock_wait: Duration,
    ) -> Self {
        Ledger {
            store,
            locks,
            clock,
            lock_wait,
        }
    }

    /// Current stock for a wine: sum of `IN` quantities minus sum of `OUT`
    /// quantities over the whole ledger.
    ///
    /// Matching is textual after trimming. Rows with other direction
    /// values are ignored and malformed quantities count as zero; an
    /// inconsistent ledger may yield a negative sum without complaint.
    pub fn current_stock(&self, wine_id: &str) -> Result<f64> {
        let table = self.store.read_all(transactions::SHEET)?;

        let mut stock = 0.0;
        for row in &table.rows {
            if cell(row, transactions::COL_WINE_ID).to_text().trim() != wine_id {
                continue;
            }
            let kind = cell(row, transactions::COL_TYPE)
                .to_text()
                .trim()
                .to_uppercase();
            let quantity = cell(row, transactions::COL_QUANTITY).number_or_zero();
            match kind.as_str() {
                TYPE_IN => stock += quantity,
                TYPE_OUT => stock -= quantity,
                _ => {}
            }
        }
        Ok(stock)
    }

    /// Validate and append one stock movement.
    ///
    /// Field checks run in a fixed fail-fast order before any lock is
    /// taken; the wine-existence check follows, and for `OUT` movements the
    /// stock check and the append run as one critical section under the
    /// cellar lock.
    pub fn record(&self, req: &TransactionRequest) -> Result<RecordedTransaction> {
        let wine_id = req.wine_id.to_text().trim().to_string();
        if wine_id.is_empty() {
            return Err(CellarError::Validation(
                "Missing required field: wineId".to_string(),
            ));
        }

        let kind = req.kind.to_text().trim().to_uppercase();
        if kind != TYPE_IN && kind != TYPE_OUT {
            return Err(CellarError::Validation(
                "Invalid type. Use \"IN\" or \"OUT\".".to_string(),
            ));
        }

        if req.quantity.is_unset() {
            return Err(CellarError::Validation(
                "Missing required field: quantity".to_string(),
            ));
        }
        let quantity = match req.quantity.to_number() {
            Some(q) if q > 0.0 => q,
            _ => {
                return Err(CellarError::Validation(
                    "Quantity must be a positive number".to_string(),
                ))
            }
        };

        let date = self.resolve_date(
            &req.transaction_date,
            "transactionDate must be in format YYYY-MM-DD",
        )?;
        let reason = req.reason.to_text().trim().to_string();
        let person = req.person.to_text().trim().to_string();
        let comment = req.comment.to_text().trim().to_string();

        if !self.wine_exists(&wine_id)? {
            return Err(CellarError::WineNotFound { wine_id });
        }

        let lock = self.locks.get_lock(CELLAR_LOCK)?;
        let _guard = LockGuard::acquire(lock, self.lock_wait)?;

        if kind == TYPE_OUT {
            let current = self.current_stock(&wine_id)?;
            if quantity > current {
                return Err(CellarError::InsufficientStock {
                    wine_id,
                    requested: quantity,
                    current_stock: current,
                });
            }
        }

        let transaction_id =
            self.append_movement(&wine_id, &kind, quantity, &date, &reason, &person, &comment)?;

        Ok(RecordedTransaction {
            transaction_id,
            wine_id,
            kind,
            quantity,
            transaction_date: date,
        })
    }

    /// Append a bootstrap `IN` movement for a freshly created wine.
    ///
    /// The caller holds the cellar lock and has already validated the
    /// quantity; the wine row must exist. A blank date defaults to today,
    /// a blank reason defaults to [`INITIAL_STOCK_REASON`].
    pub fn append_initial_stock(
        &self,
        wine_id: &str,
        quantity: f64,
        date: &CellValue,
        reason: &CellValue,
        person: &CellValue,
        comment: &CellValue,
    ) -> Result<String> {
        let date = self.resolve_date(date, "initialTransactionDate must be in format YYYY-MM-DD")?;

        let reason = match reason.to_text().trim() {
            "" => INITIAL_STOCK_REASON.to_string(),
            r => r.to_string(),
        };
        let person = person.to_text().trim().to_string();
        let comment = comment.to_text().trim().to_string();

        self.append_movement(wine_id, TYPE_IN, quantity, &date, &reason, &person, &comment)
    }

    /// True when the Wines sheet has a row with exactly this identifier.
    fn wine_exists(&self, wine_id: &str) -> Result<bool> {
        let table = self.store.read_all(wines::SHEET)?;
        Ok(table
            .rows
            .iter()
            .any(|row| cell(row, wines::COL_WINE_ID).to_text() == wine_id))
    }

    /// Resolve a raw date cell: blank defaults to today, otherwise the text
    /// must already be `YYYY-MM-DD`.
    fn resolve_date(&self, raw: &CellValue, message: &str) -> Result<String> {
        let date = raw.to_text().trim().to_string();
        if date.is_empty() {
            Ok(self.clock.today())
        } else if is_iso_date(&date) {
            Ok(date)
        } else {
            Err(CellarError::Validation(message.to_string()))
        }
    }

    fn append_movement(
        &self,
        wine_id: &str,
        kind: &str,
        quantity: f64,
        date: &str,
        reason: &str,
        person: &str,
        comment: &str,
    ) -> Result<String> {
        let transaction_id = ids::transaction_id(self.clock.now());
        let row = vec![
            CellValue::from(transaction_id.as_str()),
            CellValue::from(date),
            CellValue::from(wine_id),
            CellValue::from(quantity),
            CellValue::from(kind),
            CellValue::from(reason),
            CellValue::from(person),
            CellValue::from(comment),
        ];
        self.store.append_row(transactions::SHEET, row)?;
        Ok(transaction_id)
    }
}

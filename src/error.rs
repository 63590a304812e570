//! Error taxonomy for cellar operations.
//!
//! Every action returns a structured envelope rather than failing the
//! transport, so each error class maps to a semantic status code via
//! [`CellarError::status_code`]. Module-local errors (`SheetError`,
//! `LockError`) convert into this enum at the engine boundary.

use std::fmt;
use std::time::Duration;

use crate::lock::LockError;
use crate::sheet::SheetError;

/// Result type alias for cellar operations.
pub type Result<T> = std::result::Result<T, CellarError>;

/// Error type for cellar operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CellarError {
    /// Missing or malformed required field (semantic 400).
    Validation(String),
    /// Token missing, mismatched, or not configured (semantic 401).
    Unauthorized,
    /// A referenced wine does not exist (semantic 404). Carries the id so
    /// the envelope can echo it.
    WineNotFound { wine_id: String },
    /// A backing sheet or other resource does not exist (semantic 404).
    NotFound(String),
    /// No handler registered for the requested action (semantic 404).
    UnknownAction(String),
    /// A wine with the same (name, winery) already exists (semantic 409).
    DuplicateWine { existing_wine_id: String },
    /// An OUT transaction would drive stock negative (semantic 409).
    InsufficientStock {
        wine_id: String,
        requested: f64,
        current_stock: f64,
    },
    /// The cellar lock was not acquired within the bounded wait
    /// (semantic 503, retriable).
    LockTimeout { waited: Duration },
    /// Backing data violates an expected shape: sheet empty where data must
    /// exist, header missing a required column, write out of bounds
    /// (semantic 500).
    Integrity(String),
    /// Any other failure (semantic 500).
    Internal(String),
}

impl fmt::Display for CellarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellarError::Validation(msg) => f.write_str(msg),
            CellarError::Unauthorized => f.write_str("Unauthorized"),
            CellarError::WineNotFound { .. } => f.write_str("Wine not found"),
            CellarError::NotFound(msg) => f.write_str(msg),
            CellarError::UnknownAction(_) => f.write_str("Unknown action"),
            CellarError::DuplicateWine { .. } => f.write_str("Wine already exists"),
            CellarError::InsufficientStock { .. } => f.write_str("Insufficient stock"),
            CellarError::LockTimeout { waited } => write!(
                f,
                "Cellar busy: lock not acquired within {}ms",
                waited.as_millis()
            ),
            CellarError::Integrity(msg) => f.write_str(msg),
            CellarError::Internal(_) => f.write_str("Internal error"),
        }
    }
}

impl std::error::Error for CellarError {}

impl CellarError {
    /// Map this error to its semantic status code. The transport always
    /// answers 200; callers inspect this code inside the envelope.
    pub fn status_code(&self) -> u16 {
        match self {
            CellarError::Validation(_) => 400,
            CellarError::Unauthorized => 401,
            CellarError::WineNotFound { .. } => 404,
            CellarError::NotFound(_) => 404,
            CellarError::UnknownAction(_) => 404,
            CellarError::DuplicateWine { .. } => 409,
            CellarError::InsufficientStock { .. } => 409,
            CellarError::LockTimeout { .. } => 503,
            CellarError::Integrity(_) => 500,
            CellarError::Internal(_) => 500,
        }
    }
}

impl From<SheetError> for CellarError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::SheetNotFound(name) => {
                CellarError::NotFound(format!("Sheet not found: {}", name))
            }
            SheetError::RowOutOfBounds { .. } | SheetError::ColumnOutOfBounds { .. } => {
                CellarError::Integrity(err.to_string())
            }
            SheetError::Poisoned(_) => CellarError::Internal(err.to_string()),
        }
    }
}

impl From<LockError> for CellarError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Timeout(waited) => CellarError::LockTimeout { waited },
            LockError::Poisoned(msg) => CellarError::Internal(format!("lock poisoned: {}", msg)),
        }
    }
}

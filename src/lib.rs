mod catalog;
mod clock;
mod error;
mod ids;
mod inventory;
mod ledger;
mod statistics;
mod value;

pub mod lock;
pub mod schema;
pub mod service;
pub mod sheet;

pub use catalog::{AddedWine, Catalog, NewWine, UpdatedWine, WineUpdate};
pub use clock::{Clock, FixedClock, SystemClock, DATE_FORMAT};
pub use error::{CellarError, Result};
pub use inventory::Inventory;
pub use ledger::{
    Ledger, RecordedTransaction, TransactionRequest, INITIAL_STOCK_REASON, TYPE_IN, TYPE_OUT,
};
pub use lock::{InMemoryLock, InMemoryLockManager, Lock, LockGuard, LockManager};
pub use service::{CellarService, Envelope, ServiceConfig, DEFAULT_LOCK_WAIT};
pub use sheet::{InMemorySheetStore, SheetStore, Table};
pub use statistics::Statistics;
pub use value::CellValue;

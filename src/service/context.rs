//! Context passed to action handlers.
//!
//! Carries the parsed payload, the request method, and the engine set.
//! Handlers access everything they need through the context.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::error::{CellarError, Result};
use crate::inventory::Inventory;
use crate::ledger::Ledger;
use crate::lock::LockManager;
use crate::sheet::SheetStore;
use crate::statistics::Statistics;

/// The four engines an action handler can reach, built once per service
/// over one shared store, lock manager and clock.
pub struct Engines<S> {
    pub ledger: Ledger<S>,
    pub catalog: Catalog<S>,
    pub inventory: Inventory<S>,
    pub statistics: Statistics<S>,
}

impl<S: SheetStore> Engines<S> {
    pub fn new(
        store: Arc<S>,
        locks: Arc<dyn LockManager>,
        clock: Arc<dyn Clock>,
        lock_wait: Duration,
    ) -> Self {
        Engines {
            ledger: Ledger::new(
                Arc::clone(&store),
                Arc::clone(&locks),
                Arc::clone(&clock),
                lock_wait,
            ),
            catalog: Catalog::new(
                Arc::clone(&store),
                Arc::clone(&locks),
                Arc::clone(&clock),
                lock_wait,
            ),
            inventory: Inventory::new(Arc::clone(&store)),
            statistics: Statistics::new(store),
        }
    }
}

/// The context passed to every action handler.
pub struct Context<'a, S> {
    action: &'a str,
    method: &'a str,
    payload: &'a Map<String, Value>,
    engines: &'a Engines<S>,
}

impl<'a, S: SheetStore> Context<'a, S> {
    pub(crate) fn new(
        action: &'a str,
        method: &'a str,
        payload: &'a Map<String, Value>,
        engines: &'a Engines<S>,
    ) -> Self {
        Context {
            action,
            method,
            payload,
            engines,
        }
    }

    /// Deserialize the payload into a typed request struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.payload.clone()))
            .map_err(|e| CellarError::Validation(format!("Invalid request payload: {}", e)))
    }

    /// The raw payload object.
    pub fn payload(&self) -> &Map<String, Value> {
        self.payload
    }

    /// The action name being handled.
    pub fn action(&self) -> &str {
        self.action
    }

    /// The transport method, `"GET"` or `"POST"`.
    pub fn method(&self) -> &str {
        self.method
    }

    /// Check if the payload contains a field.
    pub fn has_field(&self, field: &str) -> bool {
        self.payload.contains_key(field)
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.engines.ledger
    }

    pub fn catalog(&self) -> &Catalog<S> {
        &self.engines.catalog
    }

    pub fn inventory(&self) -> &Inventory<S> {
        &self.engines.inventory
    }

    pub fn statistics(&self) -> &Statistics<S> {
        &self.engines.statistics
    }
}

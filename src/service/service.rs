//! Action registry and request handling.
//!
//! `CellarService<S>` owns the engine set and a map of named action
//! handlers. [`CellarService::handle`] runs the full request pipeline:
//! parse the body, check the shared-secret token, resolve the action and
//! dispatch it, always producing an [`Envelope`] rather than a transport
//! error.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Map, Value};

use crate::catalog::{NewWine, WineUpdate};
use crate::clock::{Clock, SystemClock};
use crate::error::{CellarError, Result};
use crate::ledger::TransactionRequest;
use crate::lock::{InMemoryLockManager, LockManager};
use crate::sheet::SheetStore;
use crate::value::CellValue;

use super::context::{Context, Engines};
use super::envelope::{Envelope, INTERNAL_BANNER};

/// Default bounded wait for the cellar lock.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(10);

/// Action run when a GET request names no action.
const DEFAULT_GET_ACTION: &str = "listInventory";

/// Service construction knobs.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Shared-secret token required on every request. With `None` every
    /// request is rejected as unauthorized.
    pub secret_token: Option<String>,
    /// Bounded wait for the cellar lock.
    pub lock_wait: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            secret_token: None,
            lock_wait: DEFAULT_LOCK_WAIT,
        }
    }
}

impl ServiceConfig {
    pub fn with_token(token: impl Into<String>) -> Self {
        ServiceConfig {
            secret_token: Some(token.into()),
            ..Default::default()
        }
    }
}

/// A registered action handler with its internal-failure wording.
struct ActionHandler<S> {
    failure_banner: &'static str,
    handle: Box<dyn for<'a> Fn(&Context<'a, S>) -> Result<Value> + Send + Sync>,
}

/// The cellar backend: engines plus the action registry.
pub struct CellarService<S> {
    engines: Engines<S>,
    secret_token: Option<String>,
    handlers: HashMap<String, ActionHandler<S>>,
}

impl<S: SheetStore> CellarService<S> {
    /// Create a service with the default in-memory lock manager and the
    /// system clock in UTC.
    pub fn new(store: Arc<S>, config: ServiceConfig) -> Self {
        Self::with_parts(
            store,
            Arc::new(InMemoryLockManager::new()),
            Arc::new(SystemClock::utc()),
            config,
        )
    }

    /// Create a service with explicit lock manager and clock, for tests and
    /// embedders with their own infrastructure.
    pub fn with_parts(
        store: Arc<S>,
        locks: Arc<dyn LockManager>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        let engines = Engines::new(store, locks, clock, config.lock_wait);
        let mut service = CellarService {
            engines,
            secret_token: config.secret_token,
            handlers: HashMap::new(),
        };
        service.register_actions();
        service
    }

    fn action<F>(&mut self, name: &str, failure_banner: &'static str, handler: F)
    where
        F: for<'a> Fn(&Context<'a, S>) -> Result<Value> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            ActionHandler {
                failure_banner,
                handle: Box::new(handler),
            },
        );
    }

    fn register_actions(&mut self) {
        self.action("ping", INTERNAL_BANNER, |ctx| {
            Ok(json!({
                "message": "Cellarman API is alive.",
                "project": "Cellarman",
                "method": ctx.method(),
            }))
        });

        self.action("listInventory", "Failed to list inventory", |ctx| {
            let items = ctx.inventory().merged()?;
            let stats = ctx.statistics().read_or_stub();
            Ok(json!({ "total": items.len(), "items": items, "stats": stats }))
        });

        self.action(
            "listInventorySummary",
            "Failed to list inventory summary",
            |ctx| {
                let items = ctx.inventory().summary()?;
                Ok(json!({ "total": items.len(), "items": items }))
            },
        );

        self.action("addWine", "Failed to add wine", |ctx| {
            let new_wine: NewWine = ctx.input()?;
            let added = ctx.catalog().add_wine(&new_wine)?;
            Ok(json!({
                "wineId": added.wine_id,
                "name": added.name,
                "winery": added.winery,
                "initialTransactionId": added.initial_transaction_id,
            }))
        });

        self.action("updateWine", "Failed to update wine", |ctx| {
            let update: WineUpdate = ctx.input()?;
            let updated = ctx.catalog().update_wine(&update)?;
            Ok(json!({
                "wineId": updated.wine_id,
                "updatedFields": updated.updated_fields,
            }))
        });

        self.action("addTransaction", "Failed to add transaction", |ctx| {
            let request: TransactionRequest = ctx.input()?;
            let recorded = ctx.ledger().record(&request)?;
            Ok(json!({
                "transactionId": recorded.transaction_id,
                "wineId": recorded.wine_id,
                "type": recorded.kind,
                "quantity": CellValue::from(recorded.quantity).to_json(),
                "transactionDate": recorded.transaction_date,
            }))
        });
    }

    /// List registered action names.
    pub fn actions(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }

    /// Handle one request end to end.
    ///
    /// `method` is `"GET"` or `"POST"`; `query` holds the decoded query
    /// parameters; `body` is the raw request body, parsed as JSON only for
    /// POST. A GET with no `action` parameter defaults to `listInventory`.
    pub fn handle(
        &self,
        method: &str,
        query: &HashMap<String, String>,
        body: Option<&str>,
    ) -> Envelope {
        let payload = match parse_payload(method, body) {
            Ok(payload) => payload,
            Err(details) => {
                tracing::debug!("rejecting request with unparseable body");
                return Envelope::invalid_json(&details);
            }
        };

        if let Err(err) = self.authorize(query, &payload) {
            tracing::debug!("rejecting request with missing or invalid token");
            return Envelope::failure(&err, INTERNAL_BANNER);
        }

        let action = match resolve_action(method, query, &payload) {
            Some(action) => action,
            None => {
                return Envelope::failure(
                    &CellarError::Validation("Missing action parameter".to_string()),
                    INTERNAL_BANNER,
                )
            }
        };

        tracing::info!(%method, %action, "dispatching action");
        let envelope = self.dispatch(&action, method, &payload);
        tracing::debug!(
            code = envelope.code(),
            success = envelope.is_success(),
            "action completed"
        );
        envelope
    }

    /// Dispatch an already-authorized action by name.
    pub fn dispatch(&self, action: &str, method: &str, payload: &Map<String, Value>) -> Envelope {
        let handler = match self.handlers.get(action) {
            Some(handler) => handler,
            None => {
                return Envelope::failure(
                    &CellarError::UnknownAction(action.to_string()),
                    INTERNAL_BANNER,
                )
            }
        };

        let ctx = Context::new(action, method, payload, &self.engines);
        match (handler.handle)(&ctx) {
            Ok(data) => Envelope::success(data),
            Err(err) => Envelope::failure(&err, handler.failure_banner),
        }
    }

    /// Check the shared-secret token against the query parameters and the
    /// payload. Empty strings count as absent, matching looks at `token`
    /// first and the `apiToken` alias second.
    fn authorize(&self, query: &HashMap<String, String>, payload: &Map<String, Value>) -> Result<()> {
        let supplied = query
            .get("token")
            .filter(|t| !t.is_empty())
            .cloned()
            .or_else(|| query.get("apiToken").filter(|t| !t.is_empty()).cloned())
            .or_else(|| string_field(payload, "token"))
            .or_else(|| string_field(payload, "apiToken"));

        match (&self.secret_token, supplied) {
            (Some(expected), Some(token)) if *expected == token => Ok(()),
            _ => Err(CellarError::Unauthorized),
        }
    }
}

/// Parse the request body into a payload object. Only POST bodies are
/// parsed; a parse failure reports its detail, a non-object document is
/// treated as an empty payload.
fn parse_payload(method: &str, body: Option<&str>) -> std::result::Result<Map<String, Value>, String> {
    if method != "POST" {
        return Ok(Map::new());
    }
    let contents = match body {
        Some(contents) if !contents.is_empty() => contents,
        _ => return Ok(Map::new()),
    };
    match serde_json::from_str::<Value>(contents) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(err) => Err(err.to_string()),
    }
}

/// Resolve the action name: query parameter first, then the payload; a GET
/// with neither falls back to the inventory listing.
fn resolve_action(
    method: &str,
    query: &HashMap<String, String>,
    payload: &Map<String, Value>,
) -> Option<String> {
    query
        .get("action")
        .filter(|a| !a.is_empty())
        .cloned()
        .or_else(|| string_field(payload, "action"))
        .or_else(|| {
            if method == "GET" {
                Some(DEFAULT_GET_ACTION.to_string())
            } else {
                None
            }
        })
}

fn string_field(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

//! JSON response envelopes.
//!
//! The transport always answers HTTP 200; the envelope carries the real
//! outcome: a success flag, a `data` payload or an error description, and
//! a semantic status code. Some error classes contribute extra fields
//! (`existingWineId`, `wineId`, `action`, a diagnostic `data` object) so
//! callers can react without parsing messages.

use std::fmt;

use serde_json::{json, Map, Value};

use crate::error::CellarError;
use crate::value::CellValue;

/// Failure wording used where no action-specific banner applies.
pub const INTERNAL_BANNER: &str = "Internal error";

/// One complete response body.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    body: Value,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Envelope {
            body: json!({ "success": true, "data": data }),
        }
    }

    /// Build a failure envelope for an error. `failure_banner` replaces the
    /// error text for internal failures, which expose their detail in a
    /// separate `details` field.
    pub fn failure(err: &CellarError, failure_banner: &str) -> Self {
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(false));

        match err {
            CellarError::WineNotFound { wine_id } => {
                body.insert("error".to_string(), json!("Wine not found"));
                body.insert("wineId".to_string(), json!(wine_id));
            }
            CellarError::UnknownAction(action) => {
                body.insert("error".to_string(), json!("Unknown action"));
                body.insert("action".to_string(), json!(action));
            }
            CellarError::DuplicateWine { existing_wine_id } => {
                body.insert("error".to_string(), json!("Wine already exists"));
                body.insert("existingWineId".to_string(), json!(existing_wine_id));
            }
            CellarError::InsufficientStock {
                wine_id,
                requested,
                current_stock,
            } => {
                body.insert("error".to_string(), json!("Insufficient stock"));
                body.insert(
                    "data".to_string(),
                    json!({
                        "wineId": wine_id,
                        "requestedOut": CellValue::from(*requested).to_json(),
                        "currentStock": CellValue::from(*current_stock).to_json(),
                    }),
                );
            }
            CellarError::Internal(details) => {
                body.insert("error".to_string(), json!(failure_banner));
                body.insert("details".to_string(), json!(details));
            }
            other => {
                body.insert("error".to_string(), json!(other.to_string()));
            }
        }

        body.insert("code".to_string(), json!(err.status_code()));
        Envelope {
            body: Value::Object(body),
        }
    }

    /// Envelope for a request body that failed JSON parsing.
    pub fn invalid_json(details: &str) -> Self {
        Envelope {
            body: json!({
                "success": false,
                "error": "Invalid JSON body",
                "details": details,
                "code": 400,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The semantic status code: 200 on success, the error class code
    /// otherwise.
    pub fn code(&self) -> u16 {
        if self.is_success() {
            200
        } else {
            self.body
                .get("code")
                .and_then(Value::as_u64)
                .unwrap_or(500) as u16
        }
    }

    /// The `data` payload, when present.
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }

    /// The error description of a failure envelope.
    pub fn error(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body.to_string())
    }
}

impl From<Envelope> for Value {
    fn from(envelope: Envelope) -> Value {
        envelope.body
    }
}

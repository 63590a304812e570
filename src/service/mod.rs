//! Request-facing layer: action registry, token auth, and envelopes.
//!
//! [`CellarService`] wires the engines to named actions and runs the full
//! request pipeline (body parse, token check, action dispatch). Every
//! outcome is an [`Envelope`]; the transport never signals failure itself.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use cellarman::{CellarService, InMemorySheetStore, ServiceConfig};
//!
//! let store = Arc::new(InMemorySheetStore::new() /* seed sheets */);
//! let service = CellarService::new(store, ServiceConfig::with_token("secret"));
//!
//! let envelope = service.handle("GET", &Default::default(), None);
//! assert_eq!(envelope.code(), 401);
//!
//! // HTTP transport (requires the "http" feature)
//! // cellarman::service::serve(Arc::new(service), "0.0.0.0:3000").await?;
//! ```

mod context;
mod envelope;
mod service;

pub use context::{Context, Engines};
pub use envelope::{Envelope, INTERNAL_BANNER};
pub use service::{CellarService, ServiceConfig, DEFAULT_LOCK_WAIT};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

//! HTTP transport: maps GET/POST requests to [`CellarService::handle`].
//!
//! Requires the `http` feature. Uses axum for routing. The transport
//! always answers 200 with an envelope body; the semantic status code
//! lives inside the envelope.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::sheet::SheetStore;

use super::service::CellarService;

/// Build an axum `Router` serving the cellar API at `/`.
pub fn router<S: SheetStore + 'static>(service: Arc<CellarService<S>>) -> Router {
    Router::new()
        .route("/", get(get_handler::<S>).post(post_handler::<S>))
        .with_state(service)
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S: SheetStore + 'static>(
    service: Arc<CellarService<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "cellar service listening");
    axum::serve(listener, app).await
}

async fn get_handler<S: SheetStore + 'static>(
    State(service): State<Arc<CellarService<S>>>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let envelope = service.handle("GET", &query, None);
    (StatusCode::OK, Json(envelope.into_body()))
}

async fn post_handler<S: SheetStore + 'static>(
    State(service): State<Arc<CellarService<S>>>,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse {
    let envelope = service.handle("POST", &query, Some(&body));
    (StatusCode::OK, Json(envelope.into_body()))
}

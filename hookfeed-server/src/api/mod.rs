//! HTTP API handlers.
//!
//! # Endpoints
//!
//! - `POST /webhook`    – ingest a repository webhook
//! - `GET  /api/events` – the ten most recent events, newest first

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use hookfeed_core::store::EventStore;

use crate::state::AppState;

mod events;
mod webhook;

/// Largest accepted webhook body; GitHub caps payloads at 25 MB.
pub const MAX_WEBHOOK_BODY: usize = 25 * 1024 * 1024;

/// Build the API router.
pub fn router<S: EventStore>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/webhook",
            post(webhook::receive_webhook::<S>).layer(DefaultBodyLimit::max(MAX_WEBHOOK_BODY)),
        )
        .route("/api/events", get(events::recent_events::<S>))
}

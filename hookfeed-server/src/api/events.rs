use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hookfeed_core::store::{EventStore, StoreError};
use hookfeed_sdk::objects::{CanonicalEvent, ErrorResponse, RECENT_EVENTS_LIMIT};

use crate::state::AppState;

/// `GET /api/events` — the most recent events, newest first.
pub async fn recent_events<S: EventStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<CanonicalEvent>>, EventsApiError> {
    let events = state
        .store()
        .recent(RECENT_EVENTS_LIMIT)
        .await
        .map_err(EventsApiError::Store)?;
    Ok(Json(events))
}

/// Errors that can occur in the events handler.
#[derive(Debug)]
pub enum EventsApiError {
    /// Reading from the store failed.
    Store(StoreError),
}

impl IntoResponse for EventsApiError {
    fn into_response(self) -> Response {
        match self {
            EventsApiError::Store(e) => {
                tracing::error!(error = %e, "Error fetching events");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to fetch events")),
                )
                    .into_response()
            }
        }
    }
}

use axum::{
    Json,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use hookfeed_core::ingestion::{InboundWebhook, IngestError, IngestOutcome};
use hookfeed_core::store::EventStore;
use hookfeed_sdk::objects::{EVENT_HEADER, ErrorResponse, WebhookResponse};

use crate::state::AppState;

/// `POST /webhook` — normalize and store one repository webhook.
///
/// The event identifier comes from the `X-GitHub-Event` header. A missing
/// or unreadable header is treated like an unhandled event type.
pub async fn receive_webhook<S: EventStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<WebhookResponse>, WebhookApiError> {
    let body = body.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            WebhookApiError::BodyTooLarge
        } else {
            IngestError::Internal(format!("failed to read body: {e}")).into()
        }
    })?;
    let event = headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok());

    let outcome = state
        .ingestor
        .ingest(InboundWebhook { event, body: &body })
        .await?;

    let response = match outcome {
        IngestOutcome::Stored(event) => WebhookResponse::Success { event },
        IngestOutcome::Ignored(reason) => WebhookResponse::Ignored {
            message: reason.message().to_string(),
        },
    };
    Ok(Json(response))
}

/// Errors surfaced by the webhook handler.
#[derive(Debug)]
pub enum WebhookApiError {
    /// The body exceeded [`MAX_WEBHOOK_BODY`](super::MAX_WEBHOOK_BODY).
    BodyTooLarge,
    Ingest(IngestError),
}

impl From<IngestError> for WebhookApiError {
    fn from(err: IngestError) -> Self {
        Self::Ingest(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let ingest = match self {
            WebhookApiError::BodyTooLarge => {
                tracing::warn!("Webhook body exceeds size limit, rejecting");
                return (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Json(ErrorResponse::new("Payload too large")),
                )
                    .into_response();
            }
            WebhookApiError::Ingest(err) => err,
        };
        let (status, message) = match &ingest {
            IngestError::InvalidPayload => (StatusCode::BAD_REQUEST, "Invalid JSON payload"),
            IngestError::Persistence(e) => {
                tracing::error!(error = %e, "Webhook storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "DB insert failed")
            }
            IngestError::Internal(reason) => {
                tracing::error!(%reason, "Error processing webhook");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

//! Webhook ingestion: payload parsing, routing, normalization and storage.
//!
//! # Flow
//!
//! 1. The body is parsed as JSON; an empty or unparseable body is rejected
//!    with [`IngestError::InvalidPayload`] before anything else happens.
//! 2. The event identifier and `action` pick a normalizer hint
//!    (see [`route`]). Anything not routed is ignored.
//! 3. A normalized record is appended to the [`EventStore`]. A failed write
//!    is reported and the event is dropped; nothing is retried.

use hookfeed_sdk::objects::{CanonicalEvent, EventType};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::normalizer::{NormalizeFault, Normalized, normalize};
use crate::store::{EventStore, StoreError};

/// One inbound webhook call.
#[derive(Debug, Clone, Copy)]
pub struct InboundWebhook<'a> {
    /// Value of the event-type header, if present.
    pub event: Option<&'a str>,
    /// Raw request body.
    pub body: &'a [u8],
}

/// Successful outcomes of ingesting a webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The record was persisted.
    Stored(CanonicalEvent),
    /// Nothing was persisted.
    Ignored(IgnoreReason),
}

/// Why a webhook produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The event identifier / action combination is not recorded.
    Unhandled,
    /// The event was recognized but its payload could not be normalized.
    Malformed(NormalizeFault),
}

impl IgnoreReason {
    pub fn message(&self) -> &'static str {
        match self {
            IgnoreReason::Unhandled => "Event type not processed",
            IgnoreReason::Malformed(_) => "Event payload could not be normalized",
        }
    }
}

/// Failures of ingesting a webhook.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid JSON payload")]
    InvalidPayload,
    #[error("failed to persist event: {0}")]
    Persistence(#[source] StoreError),
    #[error("internal fault: {0}")]
    Internal(String),
}

/// Ingests webhooks into an [`EventStore`].
#[derive(Debug, Clone)]
pub struct Ingestor<S> {
    store: S,
}

impl<S: EventStore> Ingestor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one webhook through parse → route → normalize → insert.
    pub async fn ingest(&self, webhook: InboundWebhook<'_>) -> Result<IngestOutcome, IngestError> {
        let payload = parse_payload(webhook.body).inspect_err(|_| {
            warn!("No JSON payload received or failed to parse");
        })?;

        let event = webhook.event.unwrap_or("<missing>");
        info!(event, "Received webhook");

        let Some(event_type) = route(webhook.event, &payload) else {
            let action = payload.get("action").and_then(Value::as_str);
            debug!(event, action, "Webhook not routed to any event type");
            return Ok(IngestOutcome::Ignored(IgnoreReason::Unhandled));
        };

        let record = match normalize(&payload, event_type.as_str()) {
            Normalized::Event(record) => record,
            Normalized::NotApplicable => {
                debug!(event, %event_type, "Normalizer did not apply to webhook");
                return Ok(IngestOutcome::Ignored(IgnoreReason::Unhandled));
            }
            Normalized::Fault(fault) => {
                warn!(event, %event_type, %fault, "Failed to normalize webhook payload");
                return Ok(IngestOutcome::Ignored(IgnoreReason::Malformed(fault)));
            }
        };

        match self.store.insert(&record).await {
            Ok(()) => {
                info!(
                    event_type = %record.event_type,
                    author = %record.author,
                    from_branch = record.from_branch.as_deref(),
                    to_branch = %record.to_branch,
                    "Stored repository event"
                );
                Ok(IngestOutcome::Stored(record))
            }
            Err(e) => {
                error!(error = %e, %event_type, "Event insert failed, dropping event");
                Err(IngestError::Persistence(e))
            }
        }
    }
}

/// Parse a webhook body.
///
/// Bodies that are empty, not JSON, or JSON with no content (`null`,
/// `false`, `0`, `""`, `[]`, `{}`) are all invalid.
pub fn parse_payload(body: &[u8]) -> Result<Value, IngestError> {
    let payload: Value = serde_json::from_slice(body).map_err(|_| IngestError::InvalidPayload)?;
    if is_blank(&payload) {
        return Err(IngestError::InvalidPayload);
    }
    Ok(payload)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Pick the normalizer hint for an event identifier and payload.
///
/// - `push` → [`EventType::Push`]
/// - `pull_request` with `action: "opened"` → [`EventType::PullRequest`]
/// - `pull_request` with `action: "closed"` and `pull_request.merged: true`
///   → [`EventType::Merge`]
pub fn route(event: Option<&str>, payload: &Value) -> Option<EventType> {
    match event? {
        "push" => Some(EventType::Push),
        "pull_request" => {
            let action = payload.get("action").and_then(Value::as_str);
            let merged = payload
                .pointer("/pull_request/merged")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            match action {
                Some("opened") => Some(EventType::PullRequest),
                Some("closed") if merged => Some(EventType::Merge),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::now_utc;
    use crate::store::MemoryEventStore;
    use hookfeed_sdk::objects::UNKNOWN;
    use serde_json::json;

    fn webhook<'a>(event: &'a str, body: &'a [u8]) -> InboundWebhook<'a> {
        InboundWebhook {
            event: Some(event),
            body,
        }
    }

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_route_decisions() {
        let push = json!({"ref": "refs/heads/main"});
        assert_eq!(route(Some("push"), &push), Some(EventType::Push));
        assert_eq!(route(None, &push), None);
        assert_eq!(route(Some("issues"), &push), None);

        let opened = json!({"action": "opened", "pull_request": {}});
        assert_eq!(route(Some("pull_request"), &opened), Some(EventType::PullRequest));

        let merged = json!({"action": "closed", "pull_request": {"merged": true}});
        assert_eq!(route(Some("pull_request"), &merged), Some(EventType::Merge));

        let closed = json!({"action": "closed", "pull_request": {"merged": false}});
        assert_eq!(route(Some("pull_request"), &closed), None);

        let truthy_string = json!({"action": "closed", "pull_request": {"merged": "yes"}});
        assert_eq!(route(Some("pull_request"), &truthy_string), None);

        let synchronize = json!({"action": "synchronize", "pull_request": {}});
        assert_eq!(route(Some("pull_request"), &synchronize), None);
    }

    #[test]
    fn test_parse_payload_rejects_blank_bodies() {
        let bodies: [&[u8]; 8] = [b"", b"   ", b"not json", b"{", b"null", b"{}", b"[]", b"\"\""];
        for raw in bodies {
            assert!(
                matches!(parse_payload(raw), Err(IngestError::InvalidPayload)),
                "expected {:?} to be rejected",
                String::from_utf8_lossy(raw)
            );
        }
        assert!(parse_payload(br#"{"zen": "Keep it logically awesome."}"#).is_ok());
    }

    #[tokio::test]
    async fn test_push_is_stored() {
        let ingestor = Ingestor::new(MemoryEventStore::new());
        let raw = body(json!({"pusher": {"name": "alice"}, "ref": "refs/heads/main"}));

        let outcome = ingestor.ingest(webhook("push", &raw)).await.unwrap();
        let IngestOutcome::Stored(event) = outcome else {
            panic!("expected a stored event");
        };
        assert_eq!(event.author, "alice");
        assert_eq!(event.to_branch, "main");
        assert_eq!(event.from_branch, None);
        assert_eq!(ingestor.store().all().await, vec![event]);
    }

    #[tokio::test]
    async fn test_closed_unmerged_pull_request_is_ignored() {
        let ingestor = Ingestor::new(MemoryEventStore::new());
        let raw = body(json!({
            "action": "closed",
            "pull_request": {"merged": false, "head": {"ref": "x"}, "base": {"ref": "main"}}
        }));

        let outcome = ingestor.ingest(webhook("pull_request", &raw)).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Ignored(IgnoreReason::Unhandled));
        assert!(ingestor.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_merge_with_missing_fields_uses_defaults() {
        let ingestor = Ingestor::new(MemoryEventStore::new());
        let raw = body(json!({"action": "closed", "pull_request": {"merged": true}}));

        let outcome = ingestor.ingest(webhook("pull_request", &raw)).await.unwrap();
        let IngestOutcome::Stored(event) = outcome else {
            panic!("expected a stored event");
        };
        assert_eq!(event.event_type, EventType::Merge);
        assert_eq!(event.author, UNKNOWN);
        assert_eq!(event.from_branch.as_deref(), Some(UNKNOWN));
        assert_eq!(event.to_branch, UNKNOWN);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_ignored_not_stored() {
        let ingestor = Ingestor::new(MemoryEventStore::new());
        let raw = body(json!({"pusher": ["alice"], "ref": "refs/heads/main"}));

        let outcome = ingestor.ingest(webhook("push", &raw)).await.unwrap();
        assert!(matches!(
            outcome,
            IngestOutcome::Ignored(IgnoreReason::Malformed(NormalizeFault::ExpectedObject { .. }))
        ));
        assert!(ingestor.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_body_never_touches_store() {
        let ingestor = Ingestor::new(MemoryEventStore::unavailable());
        let result = ingestor.ingest(webhook("push", b"")).await;
        assert!(matches!(result, Err(IngestError::InvalidPayload)));
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let ingestor = Ingestor::new(MemoryEventStore::unavailable());
        let raw = body(json!({"pusher": {"name": "alice"}, "ref": "refs/heads/main"}));

        let result = ingestor.ingest(webhook("push", &raw)).await;
        assert!(matches!(
            result,
            Err(IngestError::Persistence(StoreError::Unavailable))
        ));
    }

    #[tokio::test]
    async fn test_replay_stores_two_records() {
        let ingestor = Ingestor::new(MemoryEventStore::new());
        let raw = body(json!({"pusher": {"name": "alice"}, "ref": "refs/heads/main"}));

        ingestor.ingest(webhook("push", &raw)).await.unwrap();
        ingestor.ingest(webhook("push", &raw)).await.unwrap();

        let stored = ingestor.store().all().await;
        assert_eq!(stored.len(), 2);
        assert!(stored[0].timestamp <= stored[1].timestamp);
    }

    #[tokio::test]
    async fn test_payload_timestamp_is_not_trusted() {
        let ingestor = Ingestor::new(MemoryEventStore::new());
        let raw = body(json!({
            "pusher": {"name": "alice"},
            "ref": "refs/heads/main",
            "timestamp": "2001-01-01T00:00:00Z"
        }));

        let before = now_utc();
        let outcome = ingestor.ingest(webhook("push", &raw)).await.unwrap();
        let after = now_utc();

        let IngestOutcome::Stored(event) = outcome else {
            panic!("expected a stored event");
        };
        assert!(event.timestamp >= before && event.timestamp <= after);
        assert_eq!(event.timestamp.year(), before.year());
        assert_eq!(ingestor.store().all().await, vec![event]);
    }
}

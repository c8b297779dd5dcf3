pub mod events;
pub mod responses;

pub use events::{CanonicalEvent, EventType, UNKNOWN};
pub use responses::{ErrorResponse, HealthResponse, IndexResponse, WebhookResponse};

/// Header carrying the event-type identifier on inbound webhooks.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// Maximum number of events returned by `GET /api/events`.
pub const RECENT_EVENTS_LIMIT: i64 = 10;

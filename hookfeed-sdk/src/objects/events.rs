//! The canonical repository event record.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Placeholder used for any author or branch the payload did not carry.
pub const UNKNOWN: &str = "Unknown";

/// Kind of repository event.
///
/// This is the API/DTO version without sqlx::Type.
/// For database operations, use the version in `hookfeed-core::entities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Push,
    PullRequest,
    Merge,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Push => "push",
            EventType::PullRequest => "pull_request",
            EventType::Merge => "merge",
        }
    }

    /// Parse a normalizer hint. Unknown hints yield `None`.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint {
            "push" => Some(EventType::Push),
            "pull_request" => Some(EventType::PullRequest),
            "merge" => Some(EventType::Merge),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized record describing one repository event.
///
/// `from_branch` is `None` only for [`EventType::Push`]. `timestamp` is
/// assigned when the webhook is normalized and serializes as RFC 3339 in
/// UTC (`...Z`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub event_type: EventType,
    pub author: String,
    pub from_branch: Option<String>,
    pub to_branch: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

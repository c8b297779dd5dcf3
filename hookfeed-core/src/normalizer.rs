//! Webhook payload normalization.
//!
//! Maps a raw GitHub-shaped payload plus an event-type hint onto a
//! [`CanonicalEvent`]. Missing or `null` fields fall back to defaults
//! ([`UNKNOWN`] for authors and pull-request refs, an empty string for a
//! missing push ref). Only values of the wrong JSON type are reported, as a
//! [`NormalizeFault`].

use hookfeed_sdk::objects::{CanonicalEvent, EventType, UNKNOWN};
use serde_json::Value;
use time::OffsetDateTime;

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Result of normalizing one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The payload describes a recognized event.
    Event(CanonicalEvent),
    /// The hint does not name an event type this system records.
    NotApplicable,
    /// The hint was recognized but the payload shape could not be read.
    Fault(NormalizeFault),
}

/// A structural anomaly that default substitution cannot absorb.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeFault {
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("expected an object at `{path}`")]
    ExpectedObject { path: String },
    #[error("expected a string at `{path}`")]
    ExpectedString { path: String },
}

/// Normalize `payload` according to `hint` (`push`, `pull_request` or `merge`),
/// stamping the record with the current UTC time.
pub fn normalize(payload: &Value, hint: &str) -> Normalized {
    let Some(event_type) = EventType::from_hint(hint) else {
        return Normalized::NotApplicable;
    };
    match normalize_event(payload, event_type, now_utc()) {
        Ok(event) => Normalized::Event(event),
        Err(fault) => Normalized::Fault(fault),
    }
}

/// Normalize `payload` as `event_type` with an explicit timestamp.
pub fn normalize_event(
    payload: &Value,
    event_type: EventType,
    timestamp: OffsetDateTime,
) -> Result<CanonicalEvent, NormalizeFault> {
    if !payload.is_object() {
        return Err(NormalizeFault::NotAnObject);
    }

    let event = match event_type {
        EventType::Push => {
            let git_ref = lookup_str(payload, &["ref"])?.unwrap_or_default();
            CanonicalEvent {
                event_type,
                author: lookup_or_unknown(payload, &["pusher", "name"])?,
                from_branch: None,
                to_branch: branch_name(git_ref).to_owned(),
                timestamp,
            }
        }
        EventType::PullRequest | EventType::Merge => {
            let author_path: &[&str] = if event_type == EventType::Merge {
                &["pull_request", "merged_by", "login"]
            } else {
                &["pull_request", "user", "login"]
            };
            CanonicalEvent {
                event_type,
                author: lookup_or_unknown(payload, author_path)?,
                from_branch: Some(lookup_or_unknown(payload, &["pull_request", "head", "ref"])?),
                to_branch: lookup_or_unknown(payload, &["pull_request", "base", "ref"])?,
                timestamp,
            }
        }
    };
    Ok(event)
}

/// Strip a leading `refs/heads/`; other refs (tags, raw names) pass through.
pub fn branch_name(git_ref: &str) -> &str {
    git_ref.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(git_ref)
}

/// Current UTC time truncated to microseconds, the precision Postgres keeps.
pub fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

fn lookup_or_unknown(payload: &Value, path: &[&str]) -> Result<String, NormalizeFault> {
    Ok(lookup_str(payload, path)?.unwrap_or(UNKNOWN).to_owned())
}

/// Walk `path` through nested objects.
///
/// A missing or `null` node anywhere yields `Ok(None)`.
fn lookup_str<'a>(payload: &'a Value, path: &[&str]) -> Result<Option<&'a str>, NormalizeFault> {
    let mut node = payload;
    for (depth, key) in path.iter().enumerate() {
        let Some(object) = node.as_object() else {
            return Err(NormalizeFault::ExpectedObject {
                path: path[..depth].join("."),
            });
        };
        match object.get(*key) {
            None | Some(Value::Null) => return Ok(None),
            Some(next) => node = next,
        }
    }
    match node {
        Value::String(s) => Ok(Some(s.as_str())),
        _ => Err(NormalizeFault::ExpectedString {
            path: path.join("."),
        }),
    }
}

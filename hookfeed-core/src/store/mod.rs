//! Persistence seam for canonical events.
//!
//! Handlers and the ingestion pipeline only see [`EventStore`]. The
//! production implementation is [`DatabaseProcessor`]; tests use
//! [`MemoryEventStore`].

#[cfg(any(test, feature = "memory-store"))]
mod memory;

#[cfg(any(test, feature = "memory-store"))]
pub use memory::MemoryEventStore;

use std::future::Future;

use hookfeed_sdk::objects::CanonicalEvent;
use kanau::processor::Processor;

use crate::entities::repository_events::{InsertRepositoryEvent, ListRecentRepositoryEvents};
use crate::framework::DatabaseProcessor;

/// Errors raised by an [`EventStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("event store unavailable")]
    Unavailable,
}

/// Append-only storage of canonical events.
pub trait EventStore: Clone + Send + Sync + 'static {
    /// Append `event`. There is no update or upsert path.
    fn insert(&self, event: &CanonicalEvent) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Up to `limit` events, newest `timestamp` first.
    fn recent(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<CanonicalEvent>, StoreError>> + Send;
}

impl EventStore for DatabaseProcessor {
    async fn insert(&self, event: &CanonicalEvent) -> Result<(), StoreError> {
        let id = self.process(InsertRepositoryEvent::from(event)).await?;
        tracing::debug!(id, event_type = %event.event_type, "Repository event inserted");
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<CanonicalEvent>, StoreError> {
        let records = self.process(ListRecentRepositoryEvents { limit }).await?;
        Ok(records.into_iter().map(CanonicalEvent::from).collect())
    }
}

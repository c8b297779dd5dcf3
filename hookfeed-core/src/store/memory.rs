use std::sync::Arc;

use hookfeed_sdk::objects::CanonicalEvent;
use tokio::sync::RwLock;

use super::{EventStore, StoreError};

/// Non-durable [`EventStore`] kept in process memory.
///
/// [`MemoryEventStore::unavailable`] builds a store that rejects every
/// operation, standing in for an unreachable database.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    events: Arc<RwLock<Vec<CanonicalEvent>>>,
    unavailable: bool,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Every stored event in insertion order.
    pub async fn all(&self) -> Vec<CanonicalEvent> {
        self.events.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

impl EventStore for MemoryEventStore {
    async fn insert(&self, event: &CanonicalEvent) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<CanonicalEvent>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        let limit = usize::try_from(limit).unwrap_or(0);
        // Newest insertion first, then a stable sort keeps that order on ties.
        let mut events: Vec<_> = self.events.read().await.iter().rev().cloned().collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events.truncate(limit);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookfeed_sdk::objects::EventType;
    use time::{Duration, macros::datetime};

    fn push_at(author: &str, minutes: i64) -> CanonicalEvent {
        CanonicalEvent {
            event_type: EventType::Push,
            author: author.to_string(),
            from_branch: None,
            to_branch: "main".to_string(),
            timestamp: datetime!(2024-05-01 00:00:00 UTC) + Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let store = MemoryEventStore::new();
        for minutes in [3, 1, 12, 7, 0, 5, 9, 2, 11, 4, 8, 6, 10] {
            store.insert(&push_at("alice", minutes)).await.unwrap();
        }

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert!(recent.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(recent[0].timestamp, push_at("alice", 12).timestamp);
        assert_eq!(store.len().await, 13);
    }

    #[tokio::test]
    async fn test_recent_ties_prefer_latest_insert() {
        let store = MemoryEventStore::new();
        store.insert(&push_at("first", 1)).await.unwrap();
        store.insert(&push_at("second", 1)).await.unwrap();

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent[0].author, "second");
        assert_eq!(recent[1].author, "first");
    }

    #[tokio::test]
    async fn test_unavailable_store_rejects_everything() {
        let store = MemoryEventStore::unavailable();
        assert!(matches!(
            store.insert(&push_at("alice", 0)).await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(store.recent(10).await, Err(StoreError::Unavailable)));
        assert!(store.is_empty().await);
    }
}

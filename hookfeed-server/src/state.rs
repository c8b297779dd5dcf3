//! Application state shared across all request handlers.

use hookfeed_core::framework::DatabaseProcessor;
use hookfeed_core::ingestion::Ingestor;
use hookfeed_core::store::EventStore;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around: the store is a pooled
/// handle and nothing else is shared between requests.
#[derive(Clone)]
pub struct AppState<S = DatabaseProcessor> {
    pub ingestor: Ingestor<S>,
}

impl<S: EventStore> AppState<S> {
    /// Create a new AppState around an explicitly constructed store.
    pub fn new(store: S) -> Self {
        Self {
            ingestor: Ingestor::new(store),
        }
    }

    pub fn store(&self) -> &S {
        self.ingestor.store()
    }
}

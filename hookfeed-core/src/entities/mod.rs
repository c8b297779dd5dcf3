pub mod repository_events;

use hookfeed_sdk::objects::EventType as SdkEventType;

/// Repository event kind for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `hookfeed_sdk::objects::EventType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "repository_event_type")]
pub enum RepositoryEventType {
    Push,
    PullRequest,
    Merge,
}

impl From<RepositoryEventType> for SdkEventType {
    fn from(value: RepositoryEventType) -> Self {
        match value {
            RepositoryEventType::Push => SdkEventType::Push,
            RepositoryEventType::PullRequest => SdkEventType::PullRequest,
            RepositoryEventType::Merge => SdkEventType::Merge,
        }
    }
}

impl From<SdkEventType> for RepositoryEventType {
    fn from(value: SdkEventType) -> Self {
        match value {
            SdkEventType::Push => RepositoryEventType::Push,
            SdkEventType::PullRequest => RepositoryEventType::PullRequest,
            SdkEventType::Merge => RepositoryEventType::Merge,
        }
    }
}

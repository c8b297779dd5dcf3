use crate::entities::RepositoryEventType;
use crate::framework::DatabaseProcessor;
use hookfeed_sdk::objects::CanonicalEvent;
use kanau::processor::Processor;

/// A row of the `repository_events` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RepositoryEventRecord {
    pub id: i64,
    pub event_type: RepositoryEventType,
    pub author: String,
    pub from_branch: Option<String>,
    pub to_branch: String,
    pub occurred_at: time::OffsetDateTime,
}

impl From<RepositoryEventRecord> for CanonicalEvent {
    fn from(record: RepositoryEventRecord) -> Self {
        CanonicalEvent {
            event_type: record.event_type.into(),
            author: record.author,
            from_branch: record.from_branch,
            to_branch: record.to_branch,
            timestamp: record.occurred_at,
        }
    }
}

#[derive(Debug, Clone)]
/// Append one event. Plain insert: replays produce new rows.
///
/// Returns the generated row id.
pub struct InsertRepositoryEvent {
    pub event_type: RepositoryEventType,
    pub author: String,
    pub from_branch: Option<String>,
    pub to_branch: String,
    pub occurred_at: time::OffsetDateTime,
}

impl From<&CanonicalEvent> for InsertRepositoryEvent {
    fn from(event: &CanonicalEvent) -> Self {
        InsertRepositoryEvent {
            event_type: event.event_type.into(),
            author: event.author.clone(),
            from_branch: event.from_branch.clone(),
            to_branch: event.to_branch.clone(),
            occurred_at: event.timestamp,
        }
    }
}

impl Processor<InsertRepositoryEvent> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertRepositoryEvent")]
    async fn process(&self, insert: InsertRepositoryEvent) -> Result<i64, sqlx::Error> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO repository_events
            (event_type, author, from_branch, to_branch, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(insert.event_type)
        .bind(insert.author)
        .bind(insert.from_branch)
        .bind(insert.to_branch)
        .bind(insert.occurred_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }
}

#[derive(Debug, Clone)]
/// Fetch the newest events by `occurred_at`, ties broken by insertion order.
pub struct ListRecentRepositoryEvents {
    pub limit: i64,
}

impl Processor<ListRecentRepositoryEvents> for DatabaseProcessor {
    type Output = Vec<RepositoryEventRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListRecentRepositoryEvents")]
    async fn process(
        &self,
        query: ListRecentRepositoryEvents,
    ) -> Result<Vec<RepositoryEventRecord>, sqlx::Error> {
        let records = sqlx::query_as::<_, RepositoryEventRecord>(
            r#"
            SELECT
                id,
                event_type,
                author,
                from_branch,
                to_branch,
                occurred_at
            FROM repository_events
            ORDER BY occurred_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

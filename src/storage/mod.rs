use crate::domain::{Message, UserId, View};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use time::OffsetDateTime;
use uuid::Uuid;

pub mod memory;
pub mod postgres;
pub mod records;

pub type DbPool = Pool<Postgres>;

/// Initializes the database connection pool.
///
/// # Errors
/// Returns `sqlx::Error` if the connection fails.
pub async fn init_pool(database_url: &str) -> std::result::Result<DbPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(20).connect(database_url).await
}

/// Applies pending schema migrations.
///
/// # Errors
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn run_migrations(pool: &DbPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

/// Fields supplied by the lifecycle engine when persisting a new message.
/// The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub owner: UserId,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// Result of an atomic view insertion.
#[derive(Debug, Clone)]
pub enum ViewInsert {
    /// This call created the one and only view row for the pair.
    Created(View),
    /// Another call got there first; the caller must treat the content as
    /// already disclosed.
    AlreadyExists,
    /// The message vanished between lookup and insert (raced a delete).
    MessageGone,
}

/// Durable store for messages and views.
///
/// The store is the only shared mutable state in the system. `create_view`
/// must be atomic with respect to the (message_id, viewer) uniqueness key;
/// the engines rely on it to uphold the single-view guarantee under
/// concurrent requests.
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug {
    async fn create_message(&self, new: NewMessage) -> Result<Message>;

    async fn get_message(&self, id: Uuid) -> Result<Option<Message>>;

    /// Removes a message and cascades its views. Returns false if the
    /// message did not exist.
    async fn delete_message(&self, id: Uuid) -> Result<bool>;

    async fn find_view(&self, message_id: Uuid, viewer: &UserId) -> Result<Option<View>>;

    /// Inserts a view marker if and only if none exists for the pair.
    async fn create_view(
        &self,
        message_id: Uuid,
        viewer: &UserId,
        now: OffsetDateTime,
    ) -> Result<ViewInsert>;

    /// All views of a message, ordered by `created_at` ascending.
    async fn list_views(&self, message_id: Uuid) -> Result<Vec<View>>;

    /// Bulk-removes messages whose expiry predates `cutoff`, cascading
    /// views. Returns the number of messages removed.
    async fn purge_expired_before(&self, cutoff: OffsetDateTime) -> Result<u64>;

    /// Readiness check against the backend.
    async fn ping(&self) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::AppError;

    /// Store whose every operation fails, for asserting that backend
    /// failures reach callers as errors instead of turning into grants or
    /// denials.
    #[derive(Debug)]
    pub(crate) struct FailingStore;

    fn unavailable() -> AppError {
        AppError::Storage(sqlx::Error::PoolClosed)
    }

    #[async_trait]
    impl MessageStore for FailingStore {
        async fn create_message(&self, _new: NewMessage) -> Result<Message> {
            Err(unavailable())
        }

        async fn get_message(&self, _id: Uuid) -> Result<Option<Message>> {
            Err(unavailable())
        }

        async fn delete_message(&self, _id: Uuid) -> Result<bool> {
            Err(unavailable())
        }

        async fn find_view(&self, _message_id: Uuid, _viewer: &UserId) -> Result<Option<View>> {
            Err(unavailable())
        }

        async fn create_view(
            &self,
            _message_id: Uuid,
            _viewer: &UserId,
            _now: OffsetDateTime,
        ) -> Result<ViewInsert> {
            Err(unavailable())
        }

        async fn list_views(&self, _message_id: Uuid) -> Result<Vec<View>> {
            Err(unavailable())
        }

        async fn purge_expired_before(&self, _cutoff: OffsetDateTime) -> Result<u64> {
            Err(unavailable())
        }

        async fn ping(&self) -> Result<()> {
            Err(unavailable())
        }
    }
}

use crate::domain::{Message, UserId, View};
use crate::error::Result;
use crate::storage::records::{MessageRecord, ViewRecord};
use crate::storage::{DbPool, MessageStore, NewMessage, ViewInsert};
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// Postgres-backed store. The single-view invariant lives in the unique
/// index on `views (message_id, viewer)`; everything else is plain CRUD.
#[derive(Clone, Debug)]
pub struct PgMessageStore {
    pool: DbPool,
}

impl PgMessageStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn create_message(&self, new: NewMessage) -> Result<Message> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO messages (id, owner, body, image_url, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(new.owner.as_str())
        .bind(&new.body)
        .bind(&new.image_url)
        .bind(new.created_at)
        .bind(new.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(Message {
            id,
            owner: new.owner,
            body: new.body,
            image_url: new.image_url,
            created_at: new.created_at,
            expires_at: new.expires_at,
        })
    }

    async fn get_message(&self, id: Uuid) -> Result<Option<Message>> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, owner, body, image_url, created_at, expires_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Message::from))
    }

    async fn delete_message(&self, id: Uuid) -> Result<bool> {
        // Views go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_view(&self, message_id: Uuid, viewer: &UserId) -> Result<Option<View>> {
        let record = sqlx::query_as::<_, ViewRecord>(
            r#"
            SELECT id, message_id, viewer, created_at
            FROM views
            WHERE message_id = $1 AND viewer = $2
            "#,
        )
        .bind(message_id)
        .bind(viewer.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(View::from))
    }

    async fn create_view(
        &self,
        message_id: Uuid,
        viewer: &UserId,
        now: OffsetDateTime,
    ) -> Result<ViewInsert> {
        // ON CONFLICT DO NOTHING returns no row when another insert won the
        // race, which is exactly the "already viewed" outcome.
        let result = sqlx::query_as::<_, ViewRecord>(
            r#"
            INSERT INTO views (id, message_id, viewer, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (message_id, viewer) DO NOTHING
            RETURNING id, message_id, viewer, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(message_id)
        .bind(viewer.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(record)) => Ok(ViewInsert::Created(record.into())),
            Ok(None) => Ok(ViewInsert::AlreadyExists),
            // The message was deleted between lookup and insert.
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Ok(ViewInsert::MessageGone)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_views(&self, message_id: Uuid) -> Result<Vec<View>> {
        let records = sqlx::query_as::<_, ViewRecord>(
            r#"
            SELECT id, message_id, viewer, created_at
            FROM views
            WHERE message_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(message_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(View::from).collect())
    }

    async fn purge_expired_before(&self, cutoff: OffsetDateTime) -> Result<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE expires_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

use crate::domain::{Decision, DenyReason, Message, UserId, View};
use crate::error::Result;
use crate::storage::{MessageStore, NewMessage};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Message lifecycle engine: creation, deletion, and view auditing.
///
/// Holds no state of its own; every decision re-reads the store so that
/// concurrent requests never act on stale records.
#[derive(Clone, Debug)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    default_ttl_days: i64,
}

impl MessageService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>, default_ttl_days: i64) -> Self {
        Self { store, default_ttl_days }
    }

    /// Persists a new view-once message. Without an explicit expiry the
    /// message lives for the configured default (7 days), measured from the
    /// same instant recorded as `created_at`.
    ///
    /// Creation is deliberately permissive: empty content and past expiry
    /// are accepted, matching how posters actually use the bot.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the message cannot be stored.
    #[tracing::instrument(err(level = "warn"), skip(self, body, image_url), fields(owner = %owner))]
    pub async fn create(
        &self,
        owner: UserId,
        body: Option<String>,
        image_url: Option<String>,
        expires_at: Option<OffsetDateTime>,
    ) -> Result<Message> {
        let created_at = OffsetDateTime::now_utc();
        let expires_at =
            expires_at.unwrap_or_else(|| created_at + Duration::days(self.default_ttl_days));

        let message = self
            .store
            .create_message(NewMessage {
                owner,
                body,
                image_url,
                created_at,
                expires_at,
            })
            .await?;

        tracing::debug!(message_id = %message.id, expires_at = %message.expires_at, "Message created");
        Ok(message)
    }

    /// Deletes a message on the owner's request, cascading its views.
    ///
    /// Non-owners are denied and nothing changes. A missing message is a
    /// denial too, so a delete racing another delete stays quiet.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be reached.
    #[tracing::instrument(err(level = "warn"), skip(self), fields(message_id = %message_id, requester = %requester))]
    pub async fn delete(&self, message_id: Uuid, requester: &UserId) -> Result<Decision<()>> {
        let Some(message) = self.store.get_message(message_id).await? else {
            return Ok(Decision::Denied(DenyReason::NotFound));
        };

        if message.owner != *requester {
            tracing::debug!("Delete denied: requester is not the owner");
            return Ok(Decision::Denied(DenyReason::NotOwner));
        }

        self.store.delete_message(message_id).await?;
        tracing::info!("Message deleted by owner");
        Ok(Decision::Authorized(()))
    }

    /// Lists who has viewed a message, oldest first. Owner only; not gated
    /// on expiry, so the audit trail outlives the content.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be reached.
    #[tracing::instrument(err(level = "warn"), skip(self), fields(message_id = %message_id, requester = %requester))]
    pub async fn stats(&self, message_id: Uuid, requester: &UserId) -> Result<Decision<Vec<View>>> {
        let Some(message) = self.store.get_message(message_id).await? else {
            return Ok(Decision::Denied(DenyReason::NotFound));
        };

        if message.owner != *requester {
            tracing::debug!("Stats denied: requester is not the owner");
            return Ok(Decision::Denied(DenyReason::NotOwner));
        }

        let views = self.store.list_views(message_id).await?;
        Ok(Decision::Authorized(views))
    }
}

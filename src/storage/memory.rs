use crate::domain::{Message, UserId, View};
use crate::error::Result;
use crate::storage::{MessageStore, NewMessage, ViewInsert};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use time::OffsetDateTime;
use uuid::Uuid;

/// In-memory store used by the test suite and for local development without
/// a database. The `DashMap` entry API gives the same insert-if-absent
/// atomicity the unique index provides in Postgres.
#[derive(Debug, Default)]
pub struct MemoryStore {
    messages: DashMap<Uuid, Message>,
    views: DashMap<(Uuid, UserId), View>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn create_message(&self, new: NewMessage) -> Result<Message> {
        let message = Message {
            id: Uuid::new_v4(),
            owner: new.owner,
            body: new.body,
            image_url: new.image_url,
            created_at: new.created_at,
            expires_at: new.expires_at,
        };
        self.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn get_message(&self, id: Uuid) -> Result<Option<Message>> {
        Ok(self.messages.get(&id).map(|entry| entry.value().clone()))
    }

    async fn delete_message(&self, id: Uuid) -> Result<bool> {
        let removed = self.messages.remove(&id).is_some();
        if removed {
            self.views.retain(|(message_id, _), _| *message_id != id);
        }
        Ok(removed)
    }

    async fn find_view(&self, message_id: Uuid, viewer: &UserId) -> Result<Option<View>> {
        let key = (message_id, viewer.clone());
        Ok(self.views.get(&key).map(|entry| entry.value().clone()))
    }

    async fn create_view(
        &self,
        message_id: Uuid,
        viewer: &UserId,
        now: OffsetDateTime,
    ) -> Result<ViewInsert> {
        match self.views.entry((message_id, viewer.clone())) {
            Entry::Occupied(_) => Ok(ViewInsert::AlreadyExists),
            Entry::Vacant(slot) => {
                // Checked under the entry lock. `delete_message` removes the
                // message before sweeping views, so either the message is
                // already gone here, or the sweep runs after this insert and
                // collects it. No orphan can survive.
                if !self.messages.contains_key(&message_id) {
                    return Ok(ViewInsert::MessageGone);
                }
                let view = View {
                    id: Uuid::new_v4(),
                    message_id,
                    viewer: viewer.clone(),
                    created_at: now,
                };
                slot.insert(view.clone());
                Ok(ViewInsert::Created(view))
            }
        }
    }

    async fn list_views(&self, message_id: Uuid) -> Result<Vec<View>> {
        let mut views: Vec<View> = self
            .views
            .iter()
            .filter(|entry| entry.key().0 == message_id)
            .map(|entry| entry.value().clone())
            .collect();
        views.sort_by_key(|view| view.created_at);
        Ok(views)
    }

    async fn purge_expired_before(&self, cutoff: OffsetDateTime) -> Result<u64> {
        let expired: Vec<Uuid> = self
            .messages
            .iter()
            .filter(|entry| entry.value().expires_at < cutoff)
            .map(|entry| *entry.key())
            .collect();

        let mut removed = 0;
        for id in expired {
            if self.messages.remove(&id).is_some() {
                self.views.retain(|(message_id, _), _| *message_id != id);
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn new_message(owner: &str) -> NewMessage {
        let now = OffsetDateTime::now_utc();
        NewMessage {
            owner: UserId::new(owner),
            body: Some("secret".to_string()),
            image_url: None,
            created_at: now,
            expires_at: now + Duration::days(7),
        }
    }

    #[tokio::test]
    async fn create_view_is_insert_if_absent() {
        let store = MemoryStore::new();
        let message = store.create_message(new_message("U_OWNER")).await.unwrap();
        let viewer = UserId::new("U_VIEWER");
        let now = OffsetDateTime::now_utc();

        let first = store.create_view(message.id, &viewer, now).await.unwrap();
        assert!(matches!(first, ViewInsert::Created(_)));

        let second = store.create_view(message.id, &viewer, now).await.unwrap();
        assert!(matches!(second, ViewInsert::AlreadyExists));

        assert_eq!(store.list_views(message.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_view_for_deleted_message_reports_gone() {
        let store = MemoryStore::new();
        let message = store.create_message(new_message("U_OWNER")).await.unwrap();
        assert!(store.delete_message(message.id).await.unwrap());

        let insert = store
            .create_view(message.id, &UserId::new("U_VIEWER"), OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert!(matches!(insert, ViewInsert::MessageGone));
        // The refused insert must not leave a marker behind.
        assert!(store.list_views(message.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_views() {
        let store = MemoryStore::new();
        let message = store.create_message(new_message("U_OWNER")).await.unwrap();
        store
            .create_view(message.id, &UserId::new("U_VIEWER"), OffsetDateTime::now_utc())
            .await
            .unwrap();

        assert!(store.delete_message(message.id).await.unwrap());
        assert!(store.list_views(message.id).await.unwrap().is_empty());
        assert!(!store.delete_message(message.id).await.unwrap());
    }

    #[tokio::test]
    async fn purge_respects_cutoff() {
        let store = MemoryStore::new();
        let now = OffsetDateTime::now_utc();

        let mut old = new_message("U_OWNER");
        old.expires_at = now - Duration::days(31);
        let old = store.create_message(old).await.unwrap();

        let mut recent = new_message("U_OWNER");
        recent.expires_at = now - Duration::hours(1);
        let recent = store.create_message(recent).await.unwrap();

        let removed = store.purge_expired_before(now - Duration::days(30)).await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.get_message(old.id).await.unwrap().is_none());
        assert!(store.get_message(recent.id).await.unwrap().is_some());
    }
}

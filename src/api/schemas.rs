use crate::domain::{Message, UserId, View};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    /// Wire name is `text`; adapters speak in chat-platform terms.
    #[serde(rename = "text")]
    pub body: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

/// Envelope returned on creation: everything the adapter needs to render
/// the announcement and its buttons, without the content itself.
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub id: Uuid,
    pub owner: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl From<Message> for MessageEnvelope {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            owner: message.owner,
            created_at: message.created_at,
            expires_at: message.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ViewEntry {
    pub viewer: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub viewed_at: OffsetDateTime,
}

impl From<View> for ViewEntry {
    fn from(view: View) -> Self {
        Self { viewer: view.viewer, viewed_at: view.created_at }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct MessageRecord {
    pub id: Uuid,
    pub owner: String,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl From<MessageRecord> for crate::domain::Message {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id,
            owner: record.owner.into(),
            body: record.body,
            image_url: record.image_url,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}

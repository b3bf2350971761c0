use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct ViewRecord {
    pub id: Uuid,
    pub message_id: Uuid,
    pub viewer: String,
    pub created_at: OffsetDateTime,
}

impl From<ViewRecord> for crate::domain::View {
    fn from(record: ViewRecord) -> Self {
        Self {
            id: record.id,
            message_id: record.message_id,
            viewer: record.viewer.into(),
            created_at: record.created_at,
        }
    }
}

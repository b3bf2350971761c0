use crate::domain::user::UserId;
use time::OffsetDateTime;
use uuid::Uuid;

/// Durable marker that `viewer` has already consumed `message_id`.
///
/// At most one row exists per (message, viewer) pair. Views are never
/// updated; they disappear only when their message is deleted or purged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub id: Uuid,
    pub message_id: Uuid,
    pub viewer: UserId,
    pub created_at: OffsetDateTime,
}

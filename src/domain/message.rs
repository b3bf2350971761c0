use crate::domain::user::UserId;
use time::OffsetDateTime;
use uuid::Uuid;

/// A view-once message record.
///
/// A message stays readable by its owner until it expires; every other
/// identity gets the content disclosed at most once. The record itself may
/// outlive `expires_at` so the owner can still audit who saw it.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub owner: UserId,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl Message {
    /// A message is unreadable from `expires_at` onward, for everyone.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

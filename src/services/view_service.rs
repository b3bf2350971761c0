use crate::domain::{Decision, DenyReason, Disclosure, UserId};
use crate::error::Result;
use crate::storage::{MessageStore, ViewInsert};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

/// The single-view gate.
///
/// For a given non-owner viewer the content of a message is disclosed at
/// most once over the message's lifetime, expiry permitting. The owner is
/// never gated and never recorded.
#[derive(Clone, Debug)]
pub struct ViewService {
    store: Arc<dyn MessageStore>,
}

impl ViewService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Decides whether `viewer` may see the message right `now`.
    ///
    /// Checks run in a fixed order: existence, expiry, ownership, prior
    /// view. Expiry comes before ownership, so even the owner loses access
    /// once the message has expired. The view marker insert is atomic in the
    /// store; losing that race is reported as an ordinary duplicate view,
    /// so two concurrent first requests can never both be granted.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the store cannot be reached. Storage
    /// failures never masquerade as grants or denials.
    #[tracing::instrument(err(level = "warn"), skip(self), fields(message_id = %message_id, viewer = %viewer))]
    pub async fn authorize_view(
        &self,
        message_id: Uuid,
        viewer: &UserId,
        now: OffsetDateTime,
    ) -> Result<Decision<Disclosure>> {
        let Some(message) = self.store.get_message(message_id).await? else {
            return Ok(Decision::Denied(DenyReason::NotFound));
        };

        if message.is_expired_at(now) {
            tracing::debug!("View denied: message expired");
            return Ok(Decision::Denied(DenyReason::Expired));
        }

        let disclosure = Disclosure::from(&message);

        if message.owner == *viewer {
            // Owners re-read freely and leave no view marker.
            return Ok(Decision::Authorized(disclosure));
        }

        if self.store.find_view(message_id, viewer).await?.is_some() {
            tracing::debug!("View denied: already viewed");
            return Ok(Decision::Denied(DenyReason::AlreadyViewed));
        }

        match self.store.create_view(message_id, viewer, now).await? {
            ViewInsert::Created(_) => {
                tracing::info!("First view granted");
                Ok(Decision::Authorized(disclosure))
            }
            ViewInsert::AlreadyExists => {
                tracing::debug!("View denied: lost insert race");
                Ok(Decision::Denied(DenyReason::AlreadyViewed))
            }
            ViewInsert::MessageGone => {
                tracing::debug!("View denied: message deleted mid-request");
                Ok(Decision::Denied(DenyReason::NotFound))
            }
        }
    }
}

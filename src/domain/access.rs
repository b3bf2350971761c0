use crate::domain::message::Message;
use serde::Serialize;

/// Outcome of an authorization check.
///
/// Denials are ordinary values, not errors; only infrastructure failures
/// travel through `AppError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision<T> {
    Authorized(T),
    Denied(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The message does not exist (or no longer exists). Rendered to end
    /// users identically to `Expired`.
    NotFound,
    /// `now` is at or past the message's expiry.
    Expired,
    /// This viewer already consumed the message.
    AlreadyViewed,
    /// Delete and stats are owner-only operations.
    NotOwner,
}

impl DenyReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::AlreadyViewed => "already_viewed",
            Self::NotOwner => "not_owner",
        }
    }
}

/// The content released on a granted view. Serialized straight onto the
/// wire, where the body field is named `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Disclosure {
    #[serde(rename = "text")]
    pub body: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Message> for Disclosure {
    fn from(message: &Message) -> Self {
        Self { body: message.body.clone(), image_url: message.image_url.clone() }
    }
}

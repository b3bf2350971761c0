use crate::api::AppState;
use crate::domain::UserId;
use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

pub(crate) const ACTOR_HEADER: &str = "x-actor-id";

/// The chat-platform identity acting on this request.
///
/// Authentication is the chat gateway's job; it verifies the platform user
/// and forwards the identity in the `x-actor-id` header. A request without
/// one is rejected before any handler runs.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(ACTOR_HEADER).ok_or(AppError::MissingIdentity)?;
        let id = header.to_str().map_err(|_| AppError::MissingIdentity)?;
        if id.is_empty() {
            return Err(AppError::MissingIdentity);
        }

        Ok(Self { user_id: UserId::new(id) })
    }
}

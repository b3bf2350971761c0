use crate::api::AppState;
use crate::api::middleware::Actor;
use crate::api::schemas::{CreateMessageRequest, MessageEnvelope, ViewEntry};
use crate::domain::{Decision, DenyReason};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

/// Maps an authorization denial to its HTTP rendition. Denials are normal
/// outcomes; the adapter turns them into user-facing ephemeral replies.
fn denial(reason: DenyReason) -> Response {
    let status = match reason {
        DenyReason::NotFound => StatusCode::NOT_FOUND,
        DenyReason::Expired => StatusCode::GONE,
        DenyReason::AlreadyViewed => StatusCode::CONFLICT,
        DenyReason::NotOwner => StatusCode::FORBIDDEN,
    };
    (status, Json(json!({ "denied": reason.as_str() }))).into_response()
}

/// Posts a new view-once message on behalf of the actor.
pub async fn create_message(
    actor: Actor,
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse> {
    let message = state
        .message_service
        .create(actor.user_id, req.body, req.image_url, req.expires_at)
        .await?;

    Ok((StatusCode::CREATED, Json(MessageEnvelope::from(message))))
}

/// Requests disclosure of a message for the actor. A non-owner gets the
/// content exactly once; repeats, expiry, and unknown ids are denials.
pub async fn view_message(
    actor: Actor,
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<Response> {
    let decision = state
        .view_service
        .authorize_view(message_id, &actor.user_id, OffsetDateTime::now_utc())
        .await?;

    Ok(match decision {
        Decision::Authorized(disclosure) => (StatusCode::OK, Json(disclosure)).into_response(),
        Decision::Denied(reason) => denial(reason),
    })
}

/// Deletes a message; owner only.
pub async fn delete_message(
    actor: Actor,
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<Response> {
    let decision = state.message_service.delete(message_id, &actor.user_id).await?;

    Ok(match decision {
        Decision::Authorized(()) => StatusCode::NO_CONTENT.into_response(),
        Decision::Denied(reason) => denial(reason),
    })
}

/// Lists who has viewed a message, oldest first; owner only.
pub async fn message_stats(
    actor: Actor,
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<Response> {
    let decision = state.message_service.stats(message_id, &actor.user_id).await?;

    Ok(match decision {
        Decision::Authorized(views) => {
            let entries: Vec<ViewEntry> = views.into_iter().map(ViewEntry::from).collect();
            (StatusCode::OK, Json(entries)).into_response()
        }
        Decision::Denied(reason) => denial(reason),
    })
}

mod common;

use common::build_app;
use ephemera_server::domain::{Decision, DenyReason, UserId};
use ephemera_server::storage::MessageStore;
use time::{Duration, OffsetDateTime};

#[tokio::test]
async fn stats_list_views_in_order_of_first_access() {
    let app = build_app();
    let owner = UserId::new("U_OWNER");
    let message = app
        .message_service
        .create(owner.clone(), Some("secret".to_string()), None, None)
        .await
        .unwrap();

    let base = OffsetDateTime::now_utc();
    for (viewer, offset_secs) in [("U_CHARLIE", 30), ("U_ALICE", 10), ("U_BOB", 20)] {
        let decision = app
            .view_service
            .authorize_view(message.id, &UserId::new(viewer), base + Duration::seconds(offset_secs))
            .await
            .unwrap();
        assert!(matches!(decision, Decision::Authorized(_)));
    }

    let Decision::Authorized(views) = app.message_service.stats(message.id, &owner).await.unwrap()
    else {
        panic!("owner stats denied");
    };

    let order: Vec<&str> = views.iter().map(|v| v.viewer.as_str()).collect();
    assert_eq!(order, ["U_ALICE", "U_BOB", "U_CHARLIE"]);
    assert!(views.windows(2).all(|pair| pair[0].created_at <= pair[1].created_at));
}

#[tokio::test]
async fn delete_removes_readability_and_audit_trail() {
    let app = build_app();
    let owner = UserId::new("U_OWNER");
    let message = app
        .message_service
        .create(owner.clone(), Some("secret".to_string()), None, None)
        .await
        .unwrap();

    app.view_service
        .authorize_view(message.id, &UserId::new("U_VIEWER"), OffsetDateTime::now_utc())
        .await
        .unwrap();

    assert_eq!(
        app.message_service.delete(message.id, &owner).await.unwrap(),
        Decision::Authorized(())
    );

    // Gone for everyone, owner included, and the cascade removed the views.
    let decision = app
        .view_service
        .authorize_view(message.id, &owner, OffsetDateTime::now_utc())
        .await
        .unwrap();
    assert_eq!(decision, Decision::Denied(DenyReason::NotFound));
    assert!(app.store.list_views(message.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_delete_leaves_views_intact() {
    let app = build_app();
    let owner = UserId::new("U_OWNER");
    let message = app
        .message_service
        .create(owner.clone(), Some("secret".to_string()), None, None)
        .await
        .unwrap();

    app.view_service
        .authorize_view(message.id, &UserId::new("U_VIEWER"), OffsetDateTime::now_utc())
        .await
        .unwrap();

    let decision = app.message_service.delete(message.id, &UserId::new("U_INTRUDER")).await.unwrap();
    assert_eq!(decision, Decision::Denied(DenyReason::NotOwner));

    assert!(app.store.get_message(message.id).await.unwrap().is_some());
    assert_eq!(app.store.list_views(message.id).await.unwrap().len(), 1);
}

/// Expiry removes readability but not the audit trail: the owner can still
/// see who viewed the message while it was live.
#[tokio::test]
async fn stats_survive_expiry() {
    let app = build_app();
    let owner = UserId::new("U_OWNER");
    let expires_at = OffsetDateTime::now_utc() + Duration::minutes(5);
    let message = app
        .message_service
        .create(owner.clone(), Some("secret".to_string()), None, Some(expires_at))
        .await
        .unwrap();

    app.view_service
        .authorize_view(message.id, &UserId::new("U_VIEWER"), OffsetDateTime::now_utc())
        .await
        .unwrap();

    // Past expiry: no more views for anyone...
    let decision = app
        .view_service
        .authorize_view(message.id, &UserId::new("U_LATE"), expires_at + Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Denied(DenyReason::Expired));

    // ...but the owner's audit still works.
    let Decision::Authorized(views) = app.message_service.stats(message.id, &owner).await.unwrap()
    else {
        panic!("owner stats denied after expiry");
    };
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].viewer.as_str(), "U_VIEWER");
}

#[tokio::test]
async fn image_only_messages_are_accepted() {
    let app = build_app();
    let message = app
        .message_service
        .create(
            UserId::new("U_OWNER"),
            None,
            Some("https://example.com/cat.png".to_string()),
            None,
        )
        .await
        .unwrap();

    let Decision::Authorized(disclosure) = app
        .view_service
        .authorize_view(message.id, &UserId::new("U_VIEWER"), OffsetDateTime::now_utc())
        .await
        .unwrap()
    else {
        panic!("image-only message not viewable");
    };
    assert_eq!(disclosure.body, None);
    assert_eq!(disclosure.image_url.as_deref(), Some("https://example.com/cat.png"));
}

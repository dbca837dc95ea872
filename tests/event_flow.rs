use axum::http::StatusCode;
use serde_json::json;

use eventhub::{
    consts::db_const::{EVENT_MEMBER_TABLE, EVENT_TABLE},
    models::event_member::{EventMember, Role},
    utils::record_id::record_id,
};

mod support;

#[tokio::test]
async fn creator_becomes_hooc_and_join_codes_stay_distinct() {
    let (app, state) = support::test_app().await;
    let organizer = support::create_user(&state, "Ada", "ada@club.edu").await;
    let token = support::token_for(&state, &organizer);

    let (first_key, first_code) = support::create_event(&app, &token, "Tech Week").await;
    let (_, second_code) = support::create_event(&app, &token, "Hack Night").await;
    assert_ne!(first_code, second_code);

    let (status, body) = support::send(
        &app,
        "GET",
        &format!("/api/user/me/events/{first_key}/role"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["role"], "HoOC");
}

#[tokio::test]
async fn create_leaves_exactly_one_hooc_membership() {
    let (app, state) = support::test_app().await;
    let organizer = support::create_user(&state, "Ada", "ada@club.edu").await;
    let token = support::token_for(&state, &organizer);

    let (event_key, _) = support::create_event(&app, &token, "Tech Week").await;

    let rows = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE eventId = $event_id;")
        .bind(("table", EVENT_MEMBER_TABLE))
        .bind(("event_id", record_id(EVENT_TABLE, &event_key)))
        .await
        .expect("query")
        .take::<Vec<EventMember>>(0)
        .expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].role, Role::HoOC);
}

#[tokio::test]
async fn joining_by_code_is_idempotent_and_keeps_one_row() {
    let (app, state) = support::test_app().await;
    let organizer = support::create_user(&state, "Ada", "ada@club.edu").await;
    let member = support::create_user(&state, "Grace", "grace@club.edu").await;
    let organizer_token = support::token_for(&state, &organizer);
    let member_token = support::token_for(&state, &member);

    let (event_key, join_code) = support::create_event(&app, &organizer_token, "Tech Week").await;

    for _ in 0..2 {
        let (status, body) = support::send(
            &app,
            "POST",
            "/api/events/join",
            Some(&member_token),
            Some(json!({ "code": join_code })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let rows = state
        .sdb
        .query(
            "SELECT * FROM type::table($table) WHERE eventId = $event_id AND userId = $user_id;",
        )
        .bind(("table", EVENT_MEMBER_TABLE))
        .bind(("event_id", record_id(EVENT_TABLE, &event_key)))
        .bind(("user_id", member.id.clone()))
        .await
        .expect("query")
        .take::<Vec<EventMember>>(0)
        .expect("rows");
    assert_eq!(rows.len(), 1);

    let (status, body) = support::send(
        &app,
        "GET",
        &format!("/api/user/me/events/{event_key}/role"),
        Some(&member_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["role"], "Member");
}

#[tokio::test]
async fn unknown_join_code_is_not_found() {
    let (app, state) = support::test_app().await;
    let user = support::create_user(&state, "Ada", "ada@club.edu").await;
    let token = support::token_for(&state, &user);

    let (status, _) = support::send(
        &app,
        "POST",
        "/api/events/join",
        Some(&token),
        Some(json!({ "code": "ffffff" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_listing_hides_private_events_and_join_codes() {
    let (app, state) = support::test_app().await;
    let organizer = support::create_user(&state, "Ada", "ada@club.edu").await;
    let token = support::token_for(&state, &organizer);

    let (status, _) = support::send(
        &app,
        "POST",
        "/api/events/",
        Some(&token),
        Some(json!({
            "name": "Open Day",
            "organizerName": "CS Club",
            "visibility": "public",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // Default visibility is private, so this one must not show up.
    support::create_event(&app, &token, "Committee Only").await;

    let (status, body) = support::send(&app, "GET", "/api/events/public", None, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let items = body["data"].as_array().expect("data array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Open Day");
    assert!(items[0].get("joinCode").is_none(), "join code leaked");
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn only_hooc_may_update_or_delete_an_event() {
    let (app, state) = support::test_app().await;
    let organizer = support::create_user(&state, "Ada", "ada@club.edu").await;
    let member = support::create_user(&state, "Grace", "grace@club.edu").await;
    let organizer_token = support::token_for(&state, &organizer);
    let member_token = support::token_for(&state, &member);

    let (event_key, join_code) = support::create_event(&app, &organizer_token, "Tech Week").await;
    support::send(
        &app,
        "POST",
        "/api/events/join",
        Some(&member_token),
        Some(json!({ "code": join_code })),
    )
    .await;

    let (status, _) = support::send(
        &app,
        "PATCH",
        &format!("/api/events/{event_key}"),
        Some(&member_token),
        Some(json!({ "name": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = support::send(
        &app,
        "PATCH",
        &format!("/api/events/{event_key}"),
        Some(&organizer_token),
        Some(json!({ "name": "Renamed", "status": "ongoing" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["status"], "ongoing");

    let (status, _) = support::send(
        &app,
        "DELETE",
        &format!("/api/events/{event_key}"),
        Some(&member_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_an_event_removes_every_membership_first() {
    let (app, state) = support::test_app().await;
    let organizer = support::create_user(&state, "Ada", "ada@club.edu").await;
    let member = support::create_user(&state, "Grace", "grace@club.edu").await;
    let organizer_token = support::token_for(&state, &organizer);
    let member_token = support::token_for(&state, &member);

    let (event_key, join_code) = support::create_event(&app, &organizer_token, "Tech Week").await;
    support::send(
        &app,
        "POST",
        "/api/events/join",
        Some(&member_token),
        Some(json!({ "code": join_code })),
    )
    .await;

    let (status, body) = support::send(
        &app,
        "DELETE",
        &format!("/api/events/{event_key}"),
        Some(&organizer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let leftover = state
        .sdb
        .query("SELECT * FROM type::table($table) WHERE eventId = $event_id;")
        .bind(("table", EVENT_MEMBER_TABLE))
        .bind(("event_id", record_id(EVENT_TABLE, &event_key)))
        .await
        .expect("query")
        .take::<Vec<EventMember>>(0)
        .expect("rows");
    assert!(leftover.is_empty(), "memberships survived the delete");
}

#[tokio::test]
async fn private_event_detail_requires_membership() {
    let (app, state) = support::test_app().await;
    let organizer = support::create_user(&state, "Ada", "ada@club.edu").await;
    let outsider = support::create_user(&state, "Mallory", "mallory@club.edu").await;
    let organizer_token = support::token_for(&state, &organizer);
    let outsider_token = support::token_for(&state, &outsider);

    let (event_key, _) = support::create_event(&app, &organizer_token, "Committee Only").await;

    let (status, _) = support::send(
        &app,
        "GET",
        &format!("/api/events/detail/{event_key}"),
        Some(&outsider_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = support::send(
        &app,
        "GET",
        &format!("/api/events/detail/{event_key}"),
        Some(&organizer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "Committee Only");
}

#[tokio::test]
async fn image_list_is_managed_by_leads_only() {
    let (app, state) = support::test_app().await;
    let organizer = support::create_user(&state, "Ada", "ada@club.edu").await;
    let member = support::create_user(&state, "Grace", "grace@club.edu").await;
    let organizer_token = support::token_for(&state, &organizer);
    let member_token = support::token_for(&state, &member);

    let (event_key, join_code) = support::create_event(&app, &organizer_token, "Tech Week").await;
    support::send(
        &app,
        "POST",
        "/api/events/join",
        Some(&member_token),
        Some(json!({ "code": join_code })),
    )
    .await;

    // A plain member is outside the image gate.
    let (status, _) = support::send(
        &app,
        "POST",
        &format!("/api/events/{event_key}/images"),
        Some(&member_token),
        Some(json!({ "images": ["https://cdn.club.edu/a.png"] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = support::send(
        &app,
        "PATCH",
        &format!("/api/events/{event_key}/images"),
        Some(&organizer_token),
        Some(json!({ "images": ["https://cdn.club.edu/a.png", "https://cdn.club.edu/b.png"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["images"].as_array().expect("images").len(), 2);

    let (status, body) = support::send(
        &app,
        "POST",
        &format!("/api/events/{event_key}/images"),
        Some(&organizer_token),
        Some(json!({ "images": ["https://cdn.club.edu/c.png"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["images"].as_array().expect("images").len(), 3);

    // An empty append batch is rejected outright.
    let (status, body) = support::send(
        &app,
        "POST",
        &format!("/api/events/{event_key}/images"),
        Some(&organizer_token),
        Some(json!({ "images": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["message"], "images is required");

    let (status, body) = support::send(
        &app,
        "DELETE",
        &format!("/api/events/{event_key}/images"),
        Some(&organizer_token),
        Some(json!({ "indexes": [0, 2] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let images = body["data"]["images"].as_array().expect("images");
    assert_eq!(images.len(), 1);
    assert_eq!(images[0], "https://cdn.club.edu/b.png");
}

#[tokio::test]
async fn malformed_image_payload_keeps_the_message_envelope() {
    let (app, state) = support::test_app().await;
    let organizer = support::create_user(&state, "Ada", "ada@club.edu").await;
    let token = support::token_for(&state, &organizer);
    let (event_key, _) = support::create_event(&app, &token, "Tech Week").await;

    // `images` must be an array; a scalar body comes back as a 400 with the
    // usual `{message}` shape, not the extractor's plain-text rejection.
    let (status, body) = support::send(
        &app,
        "POST",
        &format!("/api/events/{event_key}/images"),
        Some(&token),
        Some(json!({ "images": "not-an-array" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(body["message"].is_string(), "{body}");
}

#[tokio::test]
async fn my_events_lists_memberships() {
    let (app, state) = support::test_app().await;
    let organizer = support::create_user(&state, "Ada", "ada@club.edu").await;
    let member = support::create_user(&state, "Grace", "grace@club.edu").await;
    let organizer_token = support::token_for(&state, &organizer);
    let member_token = support::token_for(&state, &member);

    let (_, join_code) = support::create_event(&app, &organizer_token, "Tech Week").await;
    support::create_event(&app, &organizer_token, "Hack Night").await;
    support::send(
        &app,
        "POST",
        "/api/events/join",
        Some(&member_token),
        Some(json!({ "code": join_code })),
    )
    .await;

    let (status, body) =
        support::send(&app, "GET", "/api/events/me/list", Some(&organizer_token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"].as_array().expect("array").len(), 2);

    let (status, body) =
        support::send(&app, "GET", "/api/events/me/list", Some(&member_token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let mine = body["data"].as_array().expect("array");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["name"], "Tech Week");
    assert_eq!(mine[0]["eventMember"]["role"], "Member");
}

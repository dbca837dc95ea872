#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use eventhub::{
    app,
    config::AppConfig,
    consts::db_const::USER_TABLE,
    models::{
        department::Department,
        user::{CreateUser, User},
    },
    routes::event::CreatedEvent,
    state::AppState,
    utils::{
        jwt::{encode_jwt, Claims},
        respond::DataEnvelope,
        time::time_now,
    },
};

pub async fn test_state() -> AppState {
    AppState::init(AppConfig::for_tests())
        .await
        .expect("in-memory db should start")
}

pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    (app(state.clone()), state)
}

pub async fn create_user(state: &AppState, full_name: &str, email: &str) -> User {
    let user: Option<User> = state
        .sdb
        .create(USER_TABLE)
        .content(CreateUser {
            full_name: full_name.to_string(),
            email: email.to_string(),
            avatar_url: None,
            created_at: time_now(),
        })
        .await
        .expect("user insert");
    user.expect("user row")
}

pub fn token_for(state: &AppState, user: &User) -> String {
    let claims = Claims::for_user(user.id.to_string());
    encode_jwt(&claims, &state.config.jwt_secret).expect("token")
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Creates an event through the API and returns (event key, join code).
pub async fn create_event(app: &Router, token: &str, name: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/events/",
        Some(token),
        Some(json!({ "name": name, "organizerName": "Robotics Club" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create event: {body}");

    let created: DataEnvelope<CreatedEvent> =
        serde_json::from_value(body).expect("created event envelope");
    (
        created.data.id.key().to_string(),
        created.data.join_code,
    )
}

/// Creates a department through the API (HoOC token) and returns its key.
pub async fn create_department(app: &Router, token: &str, event_key: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/events/{event_key}/departments"),
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create department: {body}");

    let created: DataEnvelope<Department> =
        serde_json::from_value(body).expect("department envelope");
    created.data.id.key().to_string()
}

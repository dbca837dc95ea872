use axum::http::StatusCode;
use serde_json::json;

mod support;

#[tokio::test]
async fn signup_then_signin_yields_usable_token() {
    let (app, _state) = support::test_app().await;

    let (status, body) = support::send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "fullName": "Ada Lovelace",
            "email": "ada@club.edu",
            "password": "correct-horse",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = support::send(
        &app,
        "POST",
        "/api/auth/signin",
        None,
        Some(json!({ "email": "ada@club.edu", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["data"]["token"].as_str().expect("token").to_string();

    // The token must open a protected route.
    let (status, body) = support::send(
        &app,
        "POST",
        "/api/events/",
        Some(&token),
        Some(json!({ "name": "Hack Night", "organizerName": "CS Club" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (app, _state) = support::test_app().await;

    let payload = json!({
        "fullName": "Ada Lovelace",
        "email": "ada@club.edu",
        "password": "correct-horse",
    });
    let (status, _) =
        support::send(&app, "POST", "/api/auth/signup", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = support::send(&app, "POST", "/api/auth/signup", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (app, _state) = support::test_app().await;

    let (status, _) = support::send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "fullName": "Ada Lovelace",
            "email": "ada@club.edu",
            "password": "correct-horse",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = support::send(
        &app,
        "POST",
        "/api/auth/signin",
        None,
        Some(json!({ "email": "ada@club.edu", "password": "wrong-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let (app, _state) = support::test_app().await;

    let (status, _) = support::send(
        &app,
        "POST",
        "/api/events/",
        None,
        Some(json!({ "name": "Hack Night", "organizerName": "CS Club" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = support::send(
        &app,
        "POST",
        "/api/events/",
        Some("not-a-jwt"),
        Some(json!({ "name": "Hack Night", "organizerName": "CS Club" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

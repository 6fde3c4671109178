//! Integration tests for the auth and account endpoints.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use rapport::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!("rapport-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.database.url = format!("sqlite:{}", db_path.display());

    let state = rapport::api::create_app_state(config)
        .await
        .expect("Failed to create app state");
    rapport::api::router(state)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn bearer_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, username: &str, email: &str, password: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn login(app: &Router, username: &str, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn register_login_scenario() {
    let app = spawn_app().await;

    let registered = register(&app, "alice", "a@x.com", "password123").await;
    assert_eq!(registered["username"], "alice");
    assert_eq!(registered["email"], "a@x.com");
    assert_eq!(registered["role"], "User");
    assert!(registered["token"].as_str().is_some_and(|t| !t.is_empty()));

    let response = login(&app, "alice", "password123").await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = body_json(response).await;
    assert_eq!(session["userId"], registered["userId"]);

    let response = login(&app, "alice", "wrong").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid username or password");
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = spawn_app().await;
    register(&app, "alice", "a@x.com", "pw").await;

    // Same username, different email.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "username": "alice",
                "email": "other@x.com",
                "password": "pw",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Username is already taken");

    // Same email, different username.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "username": "bob",
                "email": "a@x.com",
                "password": "pw",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Email is already registered");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn_app().await;
    register(&app, "alice", "a@x.com", "password123").await;

    let wrong_password = login(&app, "alice", "wrong").await;
    let unknown_user = login(&app, "nobody", "password123").await;

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);

    let first = body_json(wrong_password).await;
    let second = body_json(unknown_user).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer_token() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/reports")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(bearer_request("GET", "/api/reports", "not-a-real-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/reports")
                .header("Authorization", "Basic abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn current_account_flow() {
    let app = spawn_app().await;
    let session = register(&app, "alice", "a@x.com", "password123").await;
    let token = session["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(bearer_request("GET", "/api/users/current", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let account = body_json(response).await;
    assert_eq!(account["username"], "alice");
    assert_eq!(account["email"], "a@x.com");
    assert!(account.get("passwordHash").is_none());
    assert!(account.get("password_hash").is_none());

    // Change the password, then log in with it.
    let response = app
        .clone()
        .oneshot(bearer_json_request(
            "PUT",
            "/api/users/current",
            token,
            serde_json::json!({ "password": "newpass456" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = login(&app, "alice", "newpass456").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = login(&app, "alice", "password123").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn updating_email_to_one_held_by_another_account_fails() {
    let app = spawn_app().await;
    register(&app, "bob", "b@x.com", "pw").await;
    let session = register(&app, "alice", "a@x.com", "pw").await;
    let token = session["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(bearer_json_request(
            "PUT",
            "/api/users/current",
            token,
            serde_json::json!({ "email": "b@x.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Email is already taken");
}

#[tokio::test]
async fn deleting_current_account_invalidates_login() {
    let app = spawn_app().await;
    let session = register(&app, "alice", "a@x.com", "password123").await;
    let token = session["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(bearer_request("DELETE", "/api/users/current", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = login(&app, "alice", "password123").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_endpoints_enforce_the_admin_role() {
    let app = spawn_app().await;
    let user_session = register(&app, "alice", "a@x.com", "pw").await;
    let user_token = user_session["token"].as_str().unwrap();
    let alice_id = user_session["userId"].as_i64().unwrap();

    // Regular users are rejected.
    let response = app
        .clone()
        .oneshot(bearer_request("GET", "/api/users", user_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(bearer_request(
            "DELETE",
            &format!("/api/users/{alice_id}"),
            user_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The seeded bootstrap admin can list and delete accounts.
    let response = login(&app, "admin", "admin").await;
    assert_eq!(response.status(), StatusCode::OK);
    let admin_session = body_json(response).await;
    assert_eq!(admin_session["role"], "Admin");
    let admin_token = admin_session["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(bearer_request("GET", "/api/users", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let accounts = body_json(response).await;
    let accounts = accounts.as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    for account in accounts {
        assert!(account.get("passwordHash").is_none());
        assert!(account.get("password_hash").is_none());
    }

    let response = app
        .clone()
        .oneshot(bearer_request(
            "DELETE",
            &format!("/api/users/{alice_id}"),
            &admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Deleting again is a 404.
    let response = app
        .clone()
        .oneshot(bearer_request(
            "DELETE",
            &format!("/api/users/{alice_id}"),
            &admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

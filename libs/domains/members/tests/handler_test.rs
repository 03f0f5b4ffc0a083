//! Handler tests for the Members domain
//!
//! These tests drive the axum router end to end against the in-memory
//! repository: request deserialization, status codes, response shapes and
//! error masking at the HTTP boundary.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use core_config::{jwt::JwtConfig, members::MemberSettings};
use domain_members::{
    InMemoryMemberRepository, JwtTokenIssuer, MemberResponse, MemberService, handlers,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn test_app() -> (Router, JwtTokenIssuer) {
    let issuer = JwtTokenIssuer::new(JwtConfig::new("handler-test-secret-at-least-32-chars"));
    let service = MemberService::new(
        InMemoryMemberRepository::new(),
        issuer.clone(),
        MemberSettings::default(),
    );
    (handlers::router(service), issuer)
}

fn create_body(user_name: &str, email: &str) -> Value {
    json!({
        "user_name": user_name,
        "first_name": "John",
        "last_name": "Doe",
        "email": email,
        "phone_number": null,
        "role": "tech_team_member",
        "practice_id": uuid::Uuid::now_v7(),
        "source": "web",
        "created_by": "admin",
        "password": "S3cure-password!"
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        // Axum's built-in extractor rejections (e.g. 422 on bad enum
        // variants) carry plain-text bodies, not JSON.
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_create_member_returns_201_without_credentials() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/",
        Some(create_body("john.doe", "john.doe@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_name"], "john.doe");
    assert_eq!(body["is_active"], true);
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_create_duplicate_username_returns_validation_error() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/",
        Some(create_body("john.doe", "john.doe@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/",
        Some(create_body("john.doe", "other@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("UserName already exists")
    );
}

#[tokio::test]
async fn test_create_collects_all_violations_in_one_response() {
    let (app, _) = test_app();

    let mut payload = create_body("ab", "nobody@elsewhere.org");
    payload["first_name"] = json!("J");

    let (status, body) = send(&app, "POST", "/", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("UserName must be min 5 chars"));
    assert!(message.contains("First name must be min 2 chars"));
    assert!(message.contains("example.com domain"));
}

#[tokio::test]
async fn test_create_rejects_unknown_role_at_the_boundary() {
    let (app, _) = test_app();

    let mut payload = create_body("john.doe", "john.doe@example.com");
    payload["role"] = json!("galactic_overlord");

    let (status, _) = send(&app, "POST", "/", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_touches_only_supplied_fields() {
    let (app, _) = test_app();

    let (_, created) = send(
        &app,
        "POST",
        "/",
        Some(create_body("john.doe", "john.doe@example.com")),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/{id}"),
        Some(json!({
            "last_name": "Smith",
            "source": "api",
            "modified_by": "editor"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["last_name"], "Smith");
    assert_eq!(updated["first_name"], "John");
    assert_eq!(updated["email"], "john.doe@example.com");
    assert_eq!(updated["user_name"], "john.doe");
    assert_eq!(updated["modified_by"], "editor");
    assert_eq!(updated["source"], "api");
}

#[tokio::test]
async fn test_update_unknown_member_returns_404() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/{}", uuid::Uuid::now_v7()),
        Some(json!({
            "first_name": "Jane",
            "source": "api",
            "modified_by": "editor"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deactivate_is_terminal_and_blocks_login() {
    let (app, _) = test_app();

    let (_, created) = send(
        &app,
        "POST",
        "/",
        Some(create_body("john.doe", "john.doe@example.com")),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let deactivate = json!({ "modified_by": "admin", "source": "api" });

    let (status, body) = send(
        &app,
        "POST",
        &format!("/{id}/deactivate"),
        Some(deactivate.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member_id"].as_str().unwrap(), id);

    // Repeating the request reports the same not-found outcome
    let (status, _) = send(&app, "POST", &format!("/{id}/deactivate"), Some(deactivate)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        Some(json!({
            "username_or_email": "john.doe",
            "password": "S3cure-password!"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_issues_decodable_token() {
    let (app, issuer) = test_app();

    let (_, created) = send(
        &app,
        "POST",
        "/",
        Some(create_body("john.doe", "john.doe@example.com")),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        Some(json!({
            "username_or_email": "John.Doe@Example.Com",
            "password": "S3cure-password!"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let claims = issuer.decode(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, created["id"].as_str().unwrap());
    assert_eq!(claims.name, "john.doe");
    assert_eq!(claims.role, "tech_team_member");

    let member: MemberResponse = serde_json::from_value(body["member"].clone()).unwrap();
    assert!(member.last_login_at.is_some());
}

#[tokio::test]
async fn test_login_failures_share_one_generic_message() {
    let (app, _) = test_app();

    send(
        &app,
        "POST",
        "/",
        Some(create_body("john.doe", "john.doe@example.com")),
    )
    .await;

    let wrong_password = send(
        &app,
        "POST",
        "/login",
        Some(json!({
            "username_or_email": "john.doe",
            "password": "wrong"
        })),
    )
    .await;
    let unknown_user = send(
        &app,
        "POST",
        "/login",
        Some(json!({
            "username_or_email": "nobody",
            "password": "wrong"
        })),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.0, StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password.1["error"]["message"],
        unknown_user.1["error"]["message"]
    );
}

#[tokio::test]
async fn test_list_members_paginates_and_sorts() {
    let (app, _) = test_app();

    for name in ["alpha.one", "bravo.two", "charlie.three"] {
        let email = format!("{}@example.com", name.replace('.', "-"));
        let (status, _) = send(&app, "POST", "/", Some(create_body(name, &email))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        "GET",
        "/?page_number=1&page_size=2&sort_by=user_name&sort_order=ASC",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["has_previous_page"], false);
    assert_eq!(body["has_next_page"], true);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["user_name"], "alpha.one");
    assert_eq!(data[1]["user_name"], "bravo.two");
}

#[tokio::test]
async fn test_list_members_survives_hostile_sort_field() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        "GET",
        "/?sort_by=DROP%20TABLE%20members&sort_order=nonsense",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 0);
}

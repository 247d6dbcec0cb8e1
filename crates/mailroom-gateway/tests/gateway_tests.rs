// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the router with `tower::ServiceExt::oneshot`
//! against a temp database and a mock email endpoint.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use tower::ServiceExt;

use mailroom_auth::{RateLimiter, RatePolicy, SessionManager, SessionPolicy};
use mailroom_config::EmailConfig;
use mailroom_core::SystemClock;
use mailroom_desk::TicketDesk;
use mailroom_gateway::{GatewayState, router};
use mailroom_notify::{EmailClient, EventBus};
use mailroom_storage::Database;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "correct-horse-battery-staple";

async fn setup(secret: Option<&str>, email_url: Option<String>) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("gateway.db").to_str().unwrap(), true)
        .await
        .unwrap();
    let clock = Arc::new(SystemClock);

    let email_config = match email_url {
        None => EmailConfig::default(),
        Some(api_url) => EmailConfig {
            api_url,
            service_id: Some("service_1".to_string()),
            public_key: Some("pub_key".to_string()),
            private_key: Some("priv_key".to_string()),
            template_auto_reply: Some("tpl_auto".to_string()),
            template_admin_reply: Some("tpl_reply".to_string()),
            template_admin_notice: Some("tpl_notice".to_string()),
            admin_email: Some("admin@example.com".to_string()),
            ..EmailConfig::default()
        },
    };

    let events = EventBus::new();
    let desk = TicketDesk::new(
        db.clone(),
        EmailClient::new(email_config).unwrap(),
        events.clone(),
        RateLimiter::new(db.clone(), clock.clone()),
        RatePolicy::new(5, 3600),
        clock.clone(),
    );
    let state = GatewayState {
        desk: Arc::new(desk),
        sessions: Arc::new(SessionManager::new(db.clone(), clock.clone(), SessionPolicy::default())),
        limiter: Arc::new(RateLimiter::new(db, clock)),
        events,
        admin_secret: secret.map(str::to_string),
        login_policy: RatePolicy::new(5, 600),
    };
    (router(state), dir)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "203.0.113.7")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-admin-key", SECRET)
        .header("x-forwarded-for", "203.0.113.7");
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn contact_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada",
        "email": "ada@example.com",
        "message": "I would like a quote for a portfolio site.",
        "package_type": "standard"
    })
}

#[tokio::test]
async fn health_is_public() {
    let (app, _dir) = setup(Some(SECRET), None).await;
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn contact_submission_shows_up_in_the_admin_list() {
    let (app, _dir) = setup(Some(SECRET), None).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/contact", contact_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let ticket = json_body(response).await;
    assert_eq!(ticket["status"], "pending");
    assert_eq!(ticket["origin_ip"], "203.0.113.7");

    let response = app
        .oneshot(admin_request("GET", "/admin/messages", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["id"], ticket["id"]);
}

#[tokio::test]
async fn contact_schema_violations_are_validation_errors() {
    let (app, _dir) = setup(Some(SECRET), None).await;

    let mut body = contact_body();
    body["unexpected"] = serde_json::json!(1);
    let response = app
        .clone()
        .oneshot(json_request("POST", "/contact", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "VALIDATION_FAILED");

    let mut body = contact_body();
    body["email"] = serde_json::json!("not-an-email");
    let response = app
        .oneshot(json_request("POST", "/contact", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["detail"]["field"], "email");
}

#[tokio::test]
async fn sixth_contact_submission_is_rate_limited() {
    let (app, _dir) = setup(Some(SECRET), None).await;
    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/contact", contact_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = app
        .oneshot(json_request("POST", "/contact", contact_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    assert_eq!(json_body(response).await["error"], "RATE_LIMITED");
}

#[tokio::test]
async fn admin_routes_reject_missing_and_wrong_credentials() {
    let (app, _dir) = setup(Some(SECRET), None).await;

    let response = app
        .clone()
        .oneshot(Request::get("/admin/messages").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "ACCESS_DENIED");

    let response = app
        .oneshot(
            Request::get("/admin/messages")
                .header("x-admin-key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unconfigured_secret_fails_closed_with_its_own_code() {
    let (app, _dir) = setup(None, None).await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/admin/messages")
                .header("x-admin-key", "anything")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "ADMIN_SECRET_NOT_SET");

    // Login is equally impossible.
    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/auth",
            serde_json::json!({"secret_key": "anything"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "ADMIN_SECRET_NOT_SET");
}

#[tokio::test]
async fn login_issues_a_cookie_that_authorizes_and_logout_revokes_it() {
    let (app, _dir) = setup(Some(SECRET), None).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/auth",
            serde_json::json!({"secret_key": SECRET}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("admin_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::get("/admin/messages")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::post("/admin/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::get("/admin/messages")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn failed_logins_are_rate_limited_and_success_resets_the_counter() {
    let (app, _dir) = setup(Some(SECRET), None).await;

    for _ in 0..4 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/admin/auth",
                serde_json::json!({"secret_key": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Fifth attempt with the right key is still under the ceiling, and
    // success clears the counter for subsequent attempts.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/auth",
            serde_json::json!({"secret_key": SECRET}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/admin/auth",
                serde_json::json!({"secret_key": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/auth",
            serde_json::json!({"secret_key": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn reply_flow_commits_once_and_conflicts_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let (app, _dir) = setup(Some(SECRET), Some(server.uri())).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/contact", contact_body()))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            &format!("/admin/messages/{id}/reply"),
            Some(serde_json::json!({"reply": "Thanks, sending a quote"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ticket = json_body(response).await;
    assert_eq!(ticket["status"], "responded");
    assert_eq!(ticket["admin_reply"], "Thanks, sending a quote");

    let response = app
        .oneshot(admin_request(
            "POST",
            &format!("/admin/messages/{id}/reply"),
            Some(serde_json::json!({"reply": "second attempt"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], "CONFLICT");
}

#[tokio::test]
async fn reply_without_email_configured_is_a_distinct_server_error() {
    let (app, _dir) = setup(Some(SECRET), None).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/contact", contact_body()))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(admin_request(
            "POST",
            &format!("/admin/messages/{id}/reply"),
            Some(serde_json::json!({"reply": "Thanks, sending a quote"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "EMAIL_NOT_CONFIGURED");
}

#[tokio::test]
async fn delete_soft_hides_then_hard_removes() {
    let (app, _dir) = setup(Some(SECRET), None).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/contact", contact_body()))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(admin_request("DELETE", &format!("/admin/messages/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(admin_request("GET", "/admin/messages", None))
        .await
        .unwrap();
    assert!(json_body(response).await["messages"].as_array().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(admin_request(
            "DELETE",
            &format!("/admin/messages/{id}?hard=true"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(admin_request(
            "DELETE",
            &format!("/admin/messages/{id}?hard=true"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn thread_messages_flow_between_visitor_and_admin() {
    let (app, _dir) = setup(Some(SECRET), None).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/messages",
            serde_json::json!({
                "user_session": "sess-a",
                "content": "hello, anyone there?",
                "sender_name": "Ada"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Millisecond timestamps order the thread; keep the posts apart.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = app
        .clone()
        .oneshot(admin_request(
            "POST",
            "/admin/threads/sess-a",
            Some(serde_json::json!({"content": "yes, how can I help?"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(admin_request("GET", "/admin/threads", None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["sessions"], serde_json::json!(["sess-a"]));

    let response = app
        .oneshot(admin_request("GET", "/admin/threads/sess-a", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["is_from_admin"], false);
    assert_eq!(messages[1]["is_from_admin"], true);
}

#[tokio::test]
async fn event_stream_requires_admin_auth() {
    let (app, _dir) = setup(Some(SECRET), None).await;
    let response = app
        .oneshot(Request::get("/admin/events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Request bodies are strict schemas (`deny_unknown_fields`): a payload
//! with extra or misspelled fields is a validation error, not a guess.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use mailroom_auth::{ACTION_LOGIN, verify_admin_secret};
use mailroom_core::{NewTicket, ThreadMessage, Ticket};

use crate::auth::SESSION_COOKIE;
use crate::error::ApiError;
use crate::extract::{ApiJson, ClientId};
use crate::server::GatewayState;

/// Request body for POST /contact.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub package_type: Option<String>,
}

/// Request body for POST /messages (visitor thread append).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisitorMessageRequest {
    pub user_session: String,
    pub content: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub sender_email: Option<String>,
}

/// Request body for POST /admin/auth.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminAuthRequest {
    pub secret_key: String,
}

/// Request body for PATCH /admin/messages.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkReadRequest {
    pub id: String,
    pub is_read: bool,
}

/// Request body for POST /admin/messages/{id}/reply.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplyRequest {
    pub reply: String,
}

/// Request body for POST /admin/threads/{session}.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminThreadRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub hard: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct TicketListResponse {
    pub messages: Vec<Ticket>,
}

#[derive(Debug, Serialize)]
pub struct ThreadListResponse {
    pub sessions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub messages: Vec<ThreadMessage>,
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /contact
pub async fn post_contact(
    State(state): State<GatewayState>,
    ClientId(client): ClientId,
    ApiJson(body): ApiJson<ContactRequest>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let raw = NewTicket {
        name: body.name,
        email: body.email,
        message: body.message,
        package_type: body.package_type,
    };
    let ticket = state.desk.submit(&raw, &client).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// POST /messages
pub async fn post_visitor_message(
    State(state): State<GatewayState>,
    ApiJson(body): ApiJson<VisitorMessageRequest>,
) -> Result<(StatusCode, Json<ThreadMessage>), ApiError> {
    let message = state
        .desk
        .post_thread_message(
            &body.user_session,
            &body.content,
            false,
            body.sender_name.as_deref(),
            body.sender_email.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /admin/auth
///
/// Rate-limited per client; a successful login clears the client's
/// counter and answers with the session cookie.
pub async fn post_admin_auth(
    State(state): State<GatewayState>,
    ClientId(client): ClientId,
    headers: HeaderMap,
    jar: CookieJar,
    ApiJson(body): ApiJson<AdminAuthRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    state
        .limiter
        .check(ACTION_LOGIN, &client, state.login_policy)
        .await?;
    verify_admin_secret(&body.secret_key, state.admin_secret.as_deref())?;
    state.limiter.reset(ACTION_LOGIN, &client).await?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let session = state.sessions.issue(&client, user_agent).await?;
    tracing::info!(client, "admin authenticated");

    let cookie = Cookie::build((SESSION_COOKIE, session.token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build();
    Ok((jar.add(cookie), Json(AuthResponse { authenticated: true })))
}

/// POST /admin/logout
pub async fn post_admin_logout(
    State(state): State<GatewayState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.revoke(cookie.value()).await?;
    }
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    Ok((jar.remove(removal), StatusCode::NO_CONTENT))
}

/// GET /admin/messages[?unread=true]
pub async fn get_admin_messages(
    State(state): State<GatewayState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TicketListResponse>, ApiError> {
    let messages = state.desk.list(query.unread.unwrap_or(false)).await?;
    Ok(Json(TicketListResponse { messages }))
}

/// PATCH /admin/messages
pub async fn patch_admin_message(
    State(state): State<GatewayState>,
    ApiJson(body): ApiJson<MarkReadRequest>,
) -> Result<StatusCode, ApiError> {
    state.desk.mark_read(&body.id, body.is_read).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /admin/messages/{id}[?hard=true]
pub async fn delete_admin_message(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    if query.hard.unwrap_or(false) {
        state.desk.purge(&id).await?;
    } else {
        state.desk.soft_delete(&id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /admin/messages/{id}/reply
pub async fn post_admin_reply(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ReplyRequest>,
) -> Result<Json<Ticket>, ApiError> {
    let ticket = state.desk.reply(&id, &body.reply).await?;
    Ok(Json(ticket))
}

/// GET /admin/threads
pub async fn get_admin_threads(
    State(state): State<GatewayState>,
) -> Result<Json<ThreadListResponse>, ApiError> {
    let sessions = state.desk.list_threads().await?;
    Ok(Json(ThreadListResponse { sessions }))
}

/// GET /admin/threads/{session}
pub async fn get_admin_thread(
    State(state): State<GatewayState>,
    Path(session): Path<String>,
) -> Result<Json<ThreadResponse>, ApiError> {
    let messages = state.desk.get_thread(&session).await?;
    Ok(Json(ThreadResponse { messages }))
}

/// POST /admin/threads/{session}
pub async fn post_admin_thread(
    State(state): State<GatewayState>,
    Path(session): Path<String>,
    ApiJson(body): ApiJson<AdminThreadRequest>,
) -> Result<(StatusCode, Json<ThreadMessage>), ApiError> {
    let message = state
        .desk
        .post_thread_message(&session, &body.content, true, None, None)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_request_rejects_unknown_fields() {
        let json = r#"{"name": "Ada", "email": "ada@example.com", "message": "hi", "extra": 1}"#;
        assert!(serde_json::from_str::<ContactRequest>(json).is_err());

        let json = r#"{"name": "Ada", "email": "ada@example.com", "message": "hi"}"#;
        let req: ContactRequest = serde_json::from_str(json).unwrap();
        assert!(req.package_type.is_none());
    }

    #[test]
    fn auth_request_requires_the_exact_key_name() {
        assert!(serde_json::from_str::<AdminAuthRequest>(r#"{"secretKey": "x"}"#).is_err());
        let req: AdminAuthRequest =
            serde_json::from_str(r#"{"secret_key": "hunter2"}"#).unwrap();
        assert_eq!(req.secret_key, "hunter2");
    }

    #[test]
    fn mark_read_request_requires_both_fields() {
        assert!(serde_json::from_str::<MarkReadRequest>(r#"{"id": "t-1"}"#).is_err());
        let req: MarkReadRequest =
            serde_json::from_str(r#"{"id": "t-1", "is_read": true}"#).unwrap();
        assert!(req.is_read);
    }

    #[test]
    fn health_response_serializes() {
        let json = serde_json::to_string(&HealthResponse {
            status: "ok",
            version: "0.1.0",
        })
        .unwrap();
        assert!(json.contains("\"status\":\"ok\""));
    }
}

// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin authentication middleware.
//!
//! Two auth methods, checked in order:
//! 1. `admin_session` cookie validated through the `SessionManager`
//! 2. `x-admin-key` header compared constant-time against the secret
//!
//! No configured secret means every admin request is rejected with the
//! distinct not-configured error (fail-closed), and a storage error
//! during session validation is an error, never a pass.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use mailroom_auth::{SessionState, verify_admin_secret};
use mailroom_core::MailroomError;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Name of the session cookie set by `/admin/auth`.
pub const SESSION_COOKIE: &str = "admin_session";

pub async fn admin_middleware(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Response {
    match authorize(&state, request.headers()).await {
        Ok(()) => next.run(request).await,
        Err(err) => ApiError(err).into_response(),
    }
}

async fn authorize(
    state: &GatewayState,
    headers: &axum::http::HeaderMap,
) -> Result<(), MailroomError> {
    if state
        .admin_secret
        .as_deref()
        .is_none_or(|s| s.trim().is_empty())
    {
        return Err(MailroomError::NotConfigured("admin.secret".to_string()));
    }

    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        match state.sessions.validate(cookie.value()).await? {
            SessionState::Valid(_) => return Ok(()),
            SessionState::Invalid | SessionState::TimedOut => {
                tracing::debug!("presented session cookie did not validate");
            }
        }
    }

    if let Some(provided) = headers
        .get("x-admin-key")
        .and_then(|v| v.to_str().ok())
    {
        verify_admin_secret(provided, state.admin_secret.as_deref())?;
        return Ok(());
    }

    Err(MailroomError::AccessDenied)
}


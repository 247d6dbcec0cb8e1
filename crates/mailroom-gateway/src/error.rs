// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error to HTTP response mapping.
//!
//! Every failure renders as `{"error": <CODE>, "detail": ...}` with a
//! stable machine-readable code. A missing admin secret gets its own
//! code so a deployment mistake is distinguishable from a bad key.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use mailroom_core::MailroomError;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

/// Wrapper giving [`MailroomError`] an HTTP rendering.
#[derive(Debug)]
pub struct ApiError(pub MailroomError);

impl From<MailroomError> for ApiError {
    fn from(err: MailroomError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self.0 {
            MailroomError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                Some(serde_json::json!({ "field": field, "message": message })),
            ),
            MailroomError::AccessDenied => (StatusCode::UNAUTHORIZED, "ACCESS_DENIED", None),
            MailroomError::NotConfigured(key) if key == "admin.secret" => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ADMIN_SECRET_NOT_SET",
                None,
            ),
            MailroomError::NotConfigured(key) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EMAIL_NOT_CONFIGURED",
                Some(serde_json::json!({ "missing": key })),
            ),
            MailroomError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                Some(serde_json::json!({ "retry_after_secs": retry_after_secs })),
            ),
            MailroomError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                Some(serde_json::json!(what)),
            ),
            MailroomError::Conflict(what) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                Some(serde_json::json!(what)),
            ),
            MailroomError::Email { .. } => (StatusCode::BAD_GATEWAY, "EMAIL_DELIVERY_FAILED", None),
            MailroomError::Storage { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_FAILURE", None)
            }
            MailroomError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, code, "request failed");
        } else {
            tracing::debug!(error = %self.0, code, "request rejected");
        }

        let mut response = (status, Json(ErrorBody { error: code, detail })).into_response();
        if let MailroomError::RateLimited { retry_after_secs } = &self.0 {
            if let Ok(value) = header::HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

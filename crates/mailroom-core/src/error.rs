// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mailroom contact backend.

use thiserror::Error;

/// The primary error type used across the Mailroom workspace.
///
/// Variants map one-to-one onto the HTTP error taxonomy the gateway exposes:
/// validation (400), access denied (401), rate limited (429), not found (404),
/// conflict (409), and upstream/storage failures (5xx). `NotConfigured` is
/// deliberately distinct from `AccessDenied` so a missing deployment secret
/// fails closed without masquerading as a bad credential.
#[derive(Debug, Error)]
pub enum MailroomError {
    /// Input failed validation. Names the offending field.
    #[error("validation error on `{field}`: {message}")]
    Validation { field: String, message: String },

    /// Missing, invalid, or expired credential/session.
    #[error("access denied")]
    AccessDenied,

    /// A required deployment setting is absent. Always fails closed.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Too many attempts within the rolling window.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: i64 },

    /// Referenced ticket, thread, or session does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is illegal in the record's current state
    /// (e.g. replying to an already-responded ticket).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage backend errors (connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Outbound email provider errors (network, non-2xx response).
    #[error("email delivery failed: {message}")]
    Email {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MailroomError {
    /// Convenience constructor for validation failures.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

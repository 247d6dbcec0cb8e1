// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Mailroom workspace.
//!
//! Timestamps are RFC 3339 UTC strings with millisecond precision
//! (`2026-01-01T00:00:00.000Z`), the format SQLite's `strftime('%Y-%m-%dT%H:%M:%fZ')`
//! produces, so lexicographic ordering equals chronological ordering.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Response state of a ticket. Transitions only `Pending -> Responded`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Pending,
    Responded,
}

/// Tri-state lifecycle tag for a ticket.
///
/// `Active` and `SoftDeleted` are stored in the `lifecycle` column;
/// `Purged` is realized as the physical absence of the row. Soft-deleted
/// tickets are retained for audit but excluded from every listing query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Active,
    SoftDeleted,
    Purged,
}

/// One inbound contact submission and its response lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// UUID v4, assigned at creation, immutable.
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    /// Package/category tag chosen in the contact form.
    pub package_type: String,
    pub status: TicketStatus,
    pub is_read: bool,
    pub lifecycle: Lifecycle,
    /// Whether the best-effort auto-reply email went out.
    pub auto_replied: bool,
    /// Present exactly when `responded_at` is present.
    pub admin_reply: Option<String>,
    pub responded_at: Option<String>,
    /// Forwarded client IP captured for audit and rate-limit correlation.
    pub origin_ip: String,
    pub created_at: String,
}

/// One message in a visitor<->admin conversation thread.
///
/// A thread has no entity record of its own; it is the set of messages
/// sharing a `user_session` key, ordered by `created_at` ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub user_session: String,
    pub content: String,
    pub is_from_admin: bool,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub created_at: String,
}

/// Server-held record proving one successful admin authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    /// Opaque unguessable token, 32 random bytes hex-encoded.
    pub token: String,
    pub created_at: String,
    pub last_activity: String,
    /// Absolute expiry; extended on each refresh.
    pub expires_at: String,
    pub origin_ip: String,
    pub user_agent: Option<String>,
}

/// Validated-but-not-yet-persisted contact submission.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub name: String,
    pub email: String,
    pub message: String,
    pub package_type: Option<String>,
}

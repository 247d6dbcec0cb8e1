// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin session issuance, validation, and revocation.
//!
//! A session is valid while it stays under the inactivity ceiling (default
//! 30 minutes) and the absolute TTL (default 2 hours, extended on refresh).
//! Validation refreshes `last_activity` at most once per `refresh_after`
//! (default 60 seconds) to keep protected requests from writing every time.

use std::sync::Arc;

use chrono::Duration;
use rand::RngCore;
use tracing::{debug, warn};

use mailroom_core::clock::{format_stamp, parse_stamp};
use mailroom_core::{AdminSession, Clock, MailroomError};
use mailroom_storage::Database;
use mailroom_storage::queries::sessions;

/// Expiry policy for admin sessions.
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    /// Absolute TTL from issuance, extended on each refresh.
    pub ttl: Duration,
    /// Inactivity ceiling after which the session is destroyed.
    pub inactivity: Duration,
    /// Minimum idle gap before `last_activity` is rewritten.
    pub refresh_after: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(2),
            inactivity: Duration::minutes(30),
            refresh_after: Duration::seconds(60),
        }
    }
}

impl SessionPolicy {
    pub fn from_secs(ttl_secs: i64, inactivity_secs: i64, refresh_after_secs: i64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs),
            inactivity: Duration::seconds(inactivity_secs),
            refresh_after: Duration::seconds(refresh_after_secs),
        }
    }
}

/// Outcome of validating a presented session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Token maps to a live session (possibly just refreshed).
    Valid(AdminSession),
    /// Token maps to no session, or to one that cannot be trusted.
    Invalid,
    /// The session existed but exceeded its inactivity ceiling or TTL;
    /// it has been destroyed.
    TimedOut,
}

/// Issues, validates, refreshes, and revokes admin sessions.
pub struct SessionManager {
    db: Database,
    clock: Arc<dyn Clock>,
    policy: SessionPolicy,
}

impl SessionManager {
    pub fn new(db: Database, clock: Arc<dyn Clock>, policy: SessionPolicy) -> Self {
        Self { db, clock, policy }
    }

    /// Create a session for a freshly authenticated admin and return it.
    ///
    /// The token is 32 bytes from the OS CSPRNG, hex-encoded; the caller
    /// hands it back as an HttpOnly cookie.
    pub async fn issue(
        &self,
        origin_ip: &str,
        user_agent: Option<&str>,
    ) -> Result<AdminSession, MailroomError> {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let now = self.clock.now_utc();
        let session = AdminSession {
            token,
            created_at: format_stamp(now),
            last_activity: format_stamp(now),
            expires_at: format_stamp(now + self.policy.ttl),
            origin_ip: origin_ip.to_string(),
            user_agent: user_agent.map(str::to_string),
        };
        sessions::insert_session(&self.db, &session).await?;
        debug!(origin_ip, "admin session issued");
        Ok(session)
    }

    /// Validate a presented token, refreshing activity when due.
    ///
    /// Storage errors propagate as `Err`; callers must treat that as
    /// not-authorized, never as valid.
    pub async fn validate(&self, token: &str) -> Result<SessionState, MailroomError> {
        let Some(session) = sessions::get_session(&self.db, token).await? else {
            return Ok(SessionState::Invalid);
        };

        let now = self.clock.now_utc();
        let (Some(last_activity), Some(expires_at)) = (
            parse_stamp(&session.last_activity),
            parse_stamp(&session.expires_at),
        ) else {
            // Unparseable timestamps mean a tampered or corrupt record.
            warn!(
                token_prefix = token.get(..8).unwrap_or(token),
                "destroying corrupt session record"
            );
            sessions::delete_session(&self.db, token).await?;
            return Ok(SessionState::Invalid);
        };

        if now - last_activity > self.policy.inactivity || now > expires_at {
            sessions::delete_session(&self.db, token).await?;
            debug!("admin session timed out");
            return Ok(SessionState::TimedOut);
        }

        if now - last_activity > self.policy.refresh_after {
            let refreshed_last = format_stamp(now);
            let refreshed_expiry = format_stamp(now + self.policy.ttl);
            sessions::touch_session(&self.db, token, &refreshed_last, &refreshed_expiry).await?;
            return Ok(SessionState::Valid(AdminSession {
                last_activity: refreshed_last,
                expires_at: refreshed_expiry,
                ..session
            }));
        }

        Ok(SessionState::Valid(session))
    }

    /// Delete a session unconditionally (logout or tampering).
    pub async fn revoke(&self, token: &str) -> Result<(), MailroomError> {
        sessions::delete_session(&self.db, token).await
    }
}

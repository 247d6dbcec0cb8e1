// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rolling-window rate limiting per client identifier and action class.
//!
//! Policy lives here; the atomic increment-and-read lives in
//! `mailroom_storage::queries::rate_limit`. A rejected attempt returns a
//! definite `RateLimited` error and the caller must skip the protected
//! side effect.

use std::sync::Arc;

use chrono::Duration;

use mailroom_core::clock::{format_stamp, parse_stamp};
use mailroom_core::{Clock, MailroomError};
use mailroom_storage::Database;
use mailroom_storage::queries::rate_limit;

/// Action class for visitor contact submissions.
pub const ACTION_CONTACT: &str = "contact-submit";
/// Action class for admin login attempts.
pub const ACTION_LOGIN: &str = "admin-login";

/// Bucket for clients whose IP could not be determined. All IP-less
/// clients share this bucket, so they also share its ceiling.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Ceiling and window for one action class.
#[derive(Debug, Clone, Copy)]
pub struct RatePolicy {
    pub max: u32,
    pub window: Duration,
}

impl RatePolicy {
    pub fn new(max: u32, window_secs: i64) -> Self {
        Self {
            max,
            window: Duration::seconds(window_secs),
        }
    }
}

/// Counts attempts per `(action, client)` and rejects past the ceiling.
pub struct RateLimiter {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Record one attempt and reject it if the window ceiling is exceeded.
    ///
    /// The increment happens even for the rejected attempt, matching the
    /// `INCR`-then-check shape of the original counter: hammering a locked
    /// bucket never ages it out early, because the window expiry is fixed
    /// at the first attempt of the window.
    pub async fn check(
        &self,
        action: &str,
        client_id: &str,
        policy: RatePolicy,
    ) -> Result<(), MailroomError> {
        let now = self.clock.now_utc();
        let state = rate_limit::bump(
            &self.db,
            action,
            client_id,
            &format_stamp(now),
            &format_stamp(now + policy.window),
        )
        .await?;

        if state.count > i64::from(policy.max) {
            let retry_after_secs = parse_stamp(&state.window_expires_at)
                .map(|end| (end - now).num_seconds().max(0))
                .unwrap_or_else(|| policy.window.num_seconds());
            tracing::debug!(action, client_id, count = state.count, "rate limited");
            return Err(MailroomError::RateLimited { retry_after_secs });
        }
        Ok(())
    }

    /// Clear the counter for `(action, client)`, e.g. after a successful
    /// admin login.
    pub async fn reset(&self, action: &str, client_id: &str) -> Result<(), MailroomError> {
        rate_limit::reset(&self.db, action, client_id).await
    }
}

/// Derive the rate-limit client identifier from the forwarded client IP.
///
/// Takes the first entry of `X-Forwarded-For`, then the socket peer
/// address, then the shared [`UNKNOWN_CLIENT`] sentinel.
pub fn client_id(forwarded_for: Option<&str>, peer_addr: Option<&str>) -> String {
    forwarded_for
        .and_then(|raw| raw.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or(peer_addr)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

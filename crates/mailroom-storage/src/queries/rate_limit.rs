// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate-limit counter queries.
//!
//! `bump` is a single INSERT ... ON CONFLICT ... RETURNING statement, so
//! increment-and-read is atomic: two concurrent attempts cannot both
//! observe a pre-increment count below the ceiling. An expired window is
//! reset to 1 inside the same statement.

use mailroom_core::MailroomError;
use rusqlite::params;

use crate::database::Database;

/// Post-increment counter state for one `(action, client)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    /// Attempt count within the current window, including this attempt.
    pub count: i64,
    /// When the current window ends.
    pub window_expires_at: String,
}

/// Atomically increment the counter for `(action, client_id)`.
///
/// `now` is the current timestamp and `window_expires_at` the expiry to
/// install if this attempt opens a fresh window (first attempt ever, or
/// first after the previous window lapsed).
pub async fn bump(
    db: &Database,
    action: &str,
    client_id: &str,
    now: &str,
    window_expires_at: &str,
) -> Result<CounterState, MailroomError> {
    let action = action.to_string();
    let client_id = client_id.to_string();
    let now = now.to_string();
    let window_expires_at = window_expires_at.to_string();
    db.connection()
        .call(move |conn| {
            let state = conn.query_row(
                "INSERT INTO rate_limits (action, client_id, count, window_expires_at)
                 VALUES (?1, ?2, 1, ?3)
                 ON CONFLICT (action, client_id) DO UPDATE SET
                     count = CASE
                         WHEN rate_limits.window_expires_at <= ?4 THEN 1
                         ELSE rate_limits.count + 1
                     END,
                     window_expires_at = CASE
                         WHEN rate_limits.window_expires_at <= ?4 THEN ?3
                         ELSE rate_limits.window_expires_at
                     END
                 RETURNING count, window_expires_at",
                params![action, client_id, window_expires_at, now],
                |row| {
                    Ok(CounterState {
                        count: row.get(0)?,
                        window_expires_at: row.get(1)?,
                    })
                },
            )?;
            Ok(state)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Drop the counter for `(action, client_id)`.
///
/// Used after a successful admin login so a legitimate retry burst does not
/// stay locked out for the rest of the window.
pub async fn reset(db: &Database, action: &str, client_id: &str) -> Result<(), MailroomError> {
    let action = action.to_string();
    let client_id = client_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM rate_limits WHERE action = ?1 AND client_id = ?2",
                params![action, client_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

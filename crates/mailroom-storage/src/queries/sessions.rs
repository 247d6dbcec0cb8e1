// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin session storage queries.
//!
//! Expiry policy (inactivity ceiling, TTL refresh) lives in
//! `mailroom-auth::session`; this module only persists the records.

use mailroom_core::MailroomError;
use rusqlite::params;

use crate::database::Database;
use crate::models::AdminSession;

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<AdminSession> {
    Ok(AdminSession {
        token: row.get(0)?,
        created_at: row.get(1)?,
        last_activity: row.get(2)?,
        expires_at: row.get(3)?,
        origin_ip: row.get(4)?,
        user_agent: row.get(5)?,
    })
}

/// Persist a freshly issued session.
pub async fn insert_session(db: &Database, session: &AdminSession) -> Result<(), MailroomError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO admin_sessions
                    (token, created_at, last_activity, expires_at, origin_ip, user_agent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    session.token,
                    session.created_at,
                    session.last_activity,
                    session.expires_at,
                    session.origin_ip,
                    session.user_agent,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up a session by token.
pub async fn get_session(
    db: &Database,
    token: &str,
) -> Result<Option<AdminSession>, MailroomError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT token, created_at, last_activity, expires_at, origin_ip, user_agent
                 FROM admin_sessions WHERE token = ?1",
            )?;
            let result = stmt.query_row(params![token], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Refresh a session's activity marker and extend its absolute expiry.
pub async fn touch_session(
    db: &Database,
    token: &str,
    last_activity: &str,
    expires_at: &str,
) -> Result<(), MailroomError> {
    let token = token.to_string();
    let last_activity = last_activity.to_string();
    let expires_at = expires_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE admin_sessions SET last_activity = ?1, expires_at = ?2 WHERE token = ?3",
                params![last_activity, expires_at, token],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a session unconditionally (logout, expiry, tampering).
pub async fn delete_session(db: &Database, token: &str) -> Result<(), MailroomError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM admin_sessions WHERE token = ?1", params![token])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

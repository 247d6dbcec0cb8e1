// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation thread queries.
//!
//! A thread is the set of messages sharing a `user_session` key; it has no
//! entity record of its own.

use mailroom_core::MailroomError;
use rusqlite::params;

use crate::database::Database;
use crate::models::ThreadMessage;

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ThreadMessage> {
    Ok(ThreadMessage {
        id: row.get(0)?,
        user_session: row.get(1)?,
        content: row.get(2)?,
        is_from_admin: row.get(3)?,
        sender_name: row.get(4)?,
        sender_email: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Insert a new thread message.
pub async fn insert_message(db: &Database, msg: &ThreadMessage) -> Result<(), MailroomError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO thread_messages
                    (id, user_session, content, is_from_admin, sender_name, sender_email, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    msg.id,
                    msg.user_session,
                    msg.content,
                    msg.is_from_admin,
                    msg.sender_name,
                    msg.sender_email,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get one thread's messages in chronological order.
pub async fn get_thread(
    db: &Database,
    user_session: &str,
    limit: i64,
) -> Result<Vec<ThreadMessage>, MailroomError> {
    let user_session = user_session.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_session, content, is_from_admin, sender_name, sender_email, created_at
                 FROM thread_messages WHERE user_session = ?1
                 ORDER BY created_at ASC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![user_session, limit], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List distinct thread sessions, most recently active first.
pub async fn list_sessions(db: &Database, limit: i64) -> Result<Vec<String>, MailroomError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_session, MAX(created_at) AS latest
                 FROM thread_messages
                 GROUP BY user_session
                 ORDER BY latest DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| row.get::<_, String>(0))?;
            let mut sessions = Vec::new();
            for row in rows {
                sessions.push(row?);
            }
            Ok(sessions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket CRUD and lifecycle transition queries.
//!
//! State transitions are single conditional UPDATE statements, so the
//! pending-check and the write cannot be separated by a concurrent writer.

use mailroom_core::MailroomError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Lifecycle, Ticket, TicketStatus};

const TICKET_COLUMNS: &str = "id, name, email, message, package_type, status, is_read, \
     lifecycle, auto_replied, admin_reply, responded_at, origin_ip, created_at";

fn row_to_ticket(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    let status: String = row.get(5)?;
    let lifecycle: String = row.get(7)?;
    Ok(Ticket {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        message: row.get(3)?,
        package_type: row.get(4)?,
        status: status.parse::<TicketStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?,
        is_read: row.get(6)?,
        lifecycle: lifecycle.parse::<Lifecycle>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?,
        auto_replied: row.get(8)?,
        admin_reply: row.get(9)?,
        responded_at: row.get(10)?,
        origin_ip: row.get(11)?,
        created_at: row.get(12)?,
    })
}

/// Insert a newly created ticket.
///
/// A ticket is one row, so the record plus everything the listing queries
/// need lands atomically; there is no separate index write to lose.
pub async fn insert_ticket(db: &Database, ticket: &Ticket) -> Result<(), MailroomError> {
    let ticket = ticket.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tickets (id, name, email, message, package_type, status, is_read,
                        lifecycle, auto_replied, admin_reply, responded_at, origin_ip, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    ticket.id,
                    ticket.name,
                    ticket.email,
                    ticket.message,
                    ticket.package_type,
                    ticket.status.to_string(),
                    ticket.is_read,
                    ticket.lifecycle.to_string(),
                    ticket.auto_replied,
                    ticket.admin_reply,
                    ticket.responded_at,
                    ticket.origin_ip,
                    ticket.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a ticket by id, regardless of lifecycle state.
pub async fn get_ticket(db: &Database, id: &str) -> Result<Option<Ticket>, MailroomError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_ticket);
            match result {
                Ok(ticket) => Ok(Some(ticket)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List active tickets, newest-first, optionally unread-only.
///
/// Soft-deleted tickets are excluded under every filter.
pub async fn list_tickets(db: &Database, unread_only: bool) -> Result<Vec<Ticket>, MailroomError> {
    db.connection()
        .call(move |conn| {
            let sql = if unread_only {
                format!(
                    "SELECT {TICKET_COLUMNS} FROM tickets
                     WHERE lifecycle = 'active' AND is_read = 0
                     ORDER BY created_at DESC"
                )
            } else {
                format!(
                    "SELECT {TICKET_COLUMNS} FROM tickets
                     WHERE lifecycle = 'active'
                     ORDER BY created_at DESC"
                )
            };
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_ticket)?;
            let mut tickets = Vec::new();
            for row in rows {
                tickets.push(row?);
            }
            Ok(tickets)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set the read flag on an active ticket. Returns the affected row count;
/// updating an already-read ticket still counts as one row (no-op success).
pub async fn mark_read(db: &Database, id: &str, is_read: bool) -> Result<usize, MailroomError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE tickets SET is_read = ?1 WHERE id = ?2 AND lifecycle = 'active'",
                params![is_read, id],
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record that the best-effort auto-reply went out.
pub async fn set_auto_replied(db: &Database, id: &str) -> Result<(), MailroomError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE tickets SET auto_replied = 1 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Transition a ticket to `responded`, storing the reply body and timestamp.
///
/// The status check is part of the UPDATE itself, so two concurrent replies
/// cannot both succeed: the loser sees zero affected rows. Responding also
/// implies read.
pub async fn apply_reply(
    db: &Database,
    id: &str,
    reply: &str,
    responded_at: &str,
) -> Result<usize, MailroomError> {
    let id = id.to_string();
    let reply = reply.to_string();
    let responded_at = responded_at.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE tickets SET status = 'responded', admin_reply = ?1,
                        responded_at = ?2, is_read = 1
                 WHERE id = ?3 AND status = 'pending' AND lifecycle = 'active'",
                params![reply, responded_at, id],
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Soft-delete a ticket: hide it from all listings, retain the row.
pub async fn soft_delete(db: &Database, id: &str) -> Result<usize, MailroomError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE tickets SET lifecycle = 'soft_deleted'
                 WHERE id = ?1 AND lifecycle = 'active'",
                params![id],
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Hard-delete (purge) a ticket. Irreversible.
pub async fn purge(db: &Database, id: &str) -> Result<usize, MailroomError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM tickets WHERE id = ?1", params![id])?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ticket lifecycle manager.
//!
//! `TicketDesk` owns every state transition a ticket or thread can take.
//! All collaborators (database, email client, event bus, rate limiter,
//! clock) are injected at construction, so tests drive the desk with a
//! temp database, a mock email endpoint, and a manual clock.
//!
//! Side-effect policy per operation:
//! - submit: auto-reply email is best-effort, the ticket exists either way
//! - reply: the email is required and goes out before the state change
//! - visitor thread post: admin notification email is best-effort

use std::sync::Arc;

use mailroom_auth::{ACTION_CONTACT, RateLimiter, RatePolicy};
use mailroom_core::{Clock, Lifecycle, MailroomError, NewTicket, ThreadMessage, Ticket, TicketStatus};
use mailroom_notify::{EmailClient, EventBus, TicketEvent};
use mailroom_storage::Database;
use mailroom_storage::queries::{threads, tickets};
use uuid::Uuid;

use crate::validation;

pub struct TicketDesk {
    db: Database,
    email: EmailClient,
    events: EventBus,
    limiter: RateLimiter,
    contact_policy: RatePolicy,
    clock: Arc<dyn Clock>,
}

impl TicketDesk {
    pub fn new(
        db: Database,
        email: EmailClient,
        events: EventBus,
        limiter: RateLimiter,
        contact_policy: RatePolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db,
            email,
            events,
            limiter,
            contact_policy,
            clock,
        }
    }

    /// Create a ticket from a visitor submission.
    ///
    /// Rate limit first (the rejected attempt still counts), then
    /// validate, then one atomic insert. The auto-reply email runs after
    /// the insert and never fails the submission; when it goes out the
    /// `auto_replied` flag is flipped in a second write.
    pub async fn submit(&self, raw: &NewTicket, client_id: &str) -> Result<Ticket, MailroomError> {
        self.limiter
            .check(ACTION_CONTACT, client_id, self.contact_policy)
            .await?;

        let clean = validation::validate_contact(raw)?;
        let package_type = clean
            .package_type
            .clone()
            .unwrap_or_else(|| "not specified".to_string());

        let mut ticket = Ticket {
            id: Uuid::new_v4().to_string(),
            name: clean.name,
            email: clean.email,
            message: clean.message,
            package_type,
            status: TicketStatus::Pending,
            is_read: false,
            lifecycle: Lifecycle::Active,
            auto_replied: false,
            admin_reply: None,
            responded_at: None,
            origin_ip: client_id.to_string(),
            created_at: self.clock.now_stamp(),
        };
        tickets::insert_ticket(&self.db, &ticket).await?;
        tracing::info!(id = %ticket.id, "ticket created");

        match self.email.send_auto_reply(&ticket).await {
            Ok(()) => match tickets::set_auto_replied(&self.db, &ticket.id).await {
                Ok(()) => ticket.auto_replied = true,
                // The ticket exists and the mail went out; a failed flag
                // write must not turn the submission into an error.
                Err(e) => {
                    tracing::warn!(id = %ticket.id, error = %e, "auto-reply flag update failed");
                }
            },
            Err(MailroomError::NotConfigured(key)) => {
                tracing::debug!(key, "auto-reply skipped, email not configured");
            }
            Err(e) => {
                tracing::warn!(id = %ticket.id, error = %e, "auto-reply failed");
            }
        }

        self.events.publish(TicketEvent::TicketCreated {
            id: ticket.id.clone(),
            name: ticket.name.clone(),
        });
        Ok(ticket)
    }

    /// Active tickets, newest first.
    pub async fn list(&self, unread_only: bool) -> Result<Vec<Ticket>, MailroomError> {
        tickets::list_tickets(&self.db, unread_only).await
    }

    /// Set or clear the read flag. Idempotent; repeating the same value
    /// succeeds again.
    pub async fn mark_read(&self, id: &str, is_read: bool) -> Result<(), MailroomError> {
        let n = tickets::mark_read(&self.db, id, is_read).await?;
        if n == 0 {
            return Err(MailroomError::NotFound(format!("ticket {id}")));
        }
        Ok(())
    }

    /// Send the admin's reply and commit the one-way `pending ->
    /// responded` transition.
    ///
    /// The email goes out before the database changes: a delivery failure
    /// leaves the ticket pending and retryable. The transition itself is
    /// a conditional UPDATE, so of two concurrent replies exactly one
    /// commits and the loser gets `Conflict`.
    pub async fn reply(&self, id: &str, reply_body: &str) -> Result<Ticket, MailroomError> {
        let reply_body = reply_body.trim();
        if reply_body.is_empty() {
            return Err(MailroomError::validation("reply", "reply is required"));
        }

        let ticket = tickets::get_ticket(&self.db, id)
            .await?
            .filter(|t| t.lifecycle == Lifecycle::Active)
            .ok_or_else(|| MailroomError::NotFound(format!("ticket {id}")))?;
        if ticket.status == TicketStatus::Responded {
            return Err(MailroomError::Conflict(format!("ticket {id} already responded")));
        }

        self.email.send_admin_reply(&ticket, reply_body).await?;

        let responded_at = self.clock.now_stamp();
        let n = tickets::apply_reply(&self.db, id, reply_body, &responded_at).await?;
        if n == 0 {
            // A concurrent reply committed between our load and update.
            return Err(MailroomError::Conflict(format!("ticket {id} already responded")));
        }
        tracing::info!(id, "ticket replied");
        self.events.publish(TicketEvent::TicketReplied { id: id.to_string() });

        Ok(Ticket {
            status: TicketStatus::Responded,
            is_read: true,
            admin_reply: Some(reply_body.to_string()),
            responded_at: Some(responded_at),
            ..ticket
        })
    }

    /// Hide a ticket from every listing while retaining the row.
    pub async fn soft_delete(&self, id: &str) -> Result<(), MailroomError> {
        let n = tickets::soft_delete(&self.db, id).await?;
        if n == 0 {
            return Err(MailroomError::NotFound(format!("ticket {id}")));
        }
        tracing::info!(id, "ticket soft-deleted");
        Ok(())
    }

    /// Remove the row entirely. Irreversible; applies to soft-deleted
    /// tickets too.
    pub async fn purge(&self, id: &str) -> Result<(), MailroomError> {
        let n = tickets::purge(&self.db, id).await?;
        if n == 0 {
            return Err(MailroomError::NotFound(format!("ticket {id}")));
        }
        tracing::info!(id, "ticket purged");
        Ok(())
    }

    /// Append one message to a conversation thread.
    ///
    /// Visitor posts trigger a best-effort admin-notification email;
    /// admin posts do not (the admin already knows).
    pub async fn post_thread_message(
        &self,
        user_session: &str,
        content: &str,
        is_from_admin: bool,
        sender_name: Option<&str>,
        sender_email: Option<&str>,
    ) -> Result<ThreadMessage, MailroomError> {
        let user_session = validation::validate_session_key(user_session)?;
        let content = validation::validate_thread_content(content, is_from_admin)?;

        let message = ThreadMessage {
            id: Uuid::new_v4().to_string(),
            user_session: user_session.clone(),
            content: content.clone(),
            is_from_admin,
            sender_name: sender_name.map(str::to_string),
            sender_email: sender_email.map(str::to_string),
            created_at: self.clock.now_stamp(),
        };
        threads::insert_message(&self.db, &message).await?;

        if !is_from_admin {
            if let Err(e) = self
                .email
                .notify_admin_thread(&user_session, &content, sender_name, sender_email)
                .await
            {
                tracing::debug!(error = %e, "thread notification not delivered");
            }
        }

        self.events.publish(TicketEvent::ThreadPosted {
            user_session,
            is_from_admin,
        });
        Ok(message)
    }

    /// One thread's messages, oldest first.
    pub async fn get_thread(&self, user_session: &str) -> Result<Vec<ThreadMessage>, MailroomError> {
        let user_session = validation::validate_session_key(user_session)?;
        threads::get_thread(&self.db, &user_session, 500).await
    }

    /// Distinct thread sessions, most recently active first.
    pub async fn list_threads(&self) -> Result<Vec<String>, MailroomError> {
        threads::list_sessions(&self.db, 200).await
    }
}

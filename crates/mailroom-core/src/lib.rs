// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mailroom contact backend.
//!
//! This crate provides the error taxonomy, the domain types shared across
//! the workspace (tickets, conversation threads, admin sessions), and the
//! `Clock` seam that lets the session and rate-limit logic run against a
//! controllable time source in tests.

pub mod clock;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::MailroomError;
pub use types::{AdminSession, Lifecycle, NewTicket, ThreadMessage, Ticket, TicketStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ticket_status_round_trips_through_strings() {
        for status in [TicketStatus::Pending, TicketStatus::Responded] {
            let s = status.to_string();
            let parsed = TicketStatus::from_str(&s).expect("should parse back");
            assert_eq!(status, parsed);
        }
        assert_eq!(TicketStatus::Pending.to_string(), "pending");
        assert_eq!(TicketStatus::Responded.to_string(), "responded");
    }

    #[test]
    fn lifecycle_round_trips_through_strings() {
        for lifecycle in [
            Lifecycle::Active,
            Lifecycle::SoftDeleted,
            Lifecycle::Purged,
        ] {
            let s = lifecycle.to_string();
            let parsed = Lifecycle::from_str(&s).expect("should parse back");
            assert_eq!(lifecycle, parsed);
        }
        assert_eq!(Lifecycle::SoftDeleted.to_string(), "soft_deleted");
    }

    #[test]
    fn error_variants_construct() {
        let _validation = MailroomError::Validation {
            field: "email".into(),
            message: "invalid email address".into(),
        };
        let _denied = MailroomError::AccessDenied;
        let _unconfigured = MailroomError::NotConfigured("admin secret".into());
        let _limited = MailroomError::RateLimited {
            retry_after_secs: 3600,
        };
        let _missing = MailroomError::NotFound("ticket abc".into());
        let _conflict = MailroomError::Conflict("ticket already responded".into());
        let _storage = MailroomError::Storage {
            source: Box::new(std::io::Error::other("disk gone")),
        };
        let _email = MailroomError::Email {
            message: "provider returned 500".into(),
            source: None,
        };
        let _internal = MailroomError::Internal("unreachable".into());
    }

    #[test]
    fn system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now_utc();
        let b = clock.now_utc();
        assert!(b >= a);
    }
}

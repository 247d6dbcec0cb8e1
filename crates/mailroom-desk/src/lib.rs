// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket lifecycle management for mailroom.
//!
//! The [`TicketDesk`] is the single entry point for every ticket and
//! thread state transition; the HTTP gateway is a thin shell over it.

pub mod desk;
pub mod validation;

pub use desk::TicketDesk;

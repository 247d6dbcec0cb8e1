// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `mailroom-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use mailroom_core::types::{AdminSession, Lifecycle, ThreadMessage, Ticket, TicketStatus};

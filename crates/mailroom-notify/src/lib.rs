// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification side effects for mailroom: outbound transactional email
//! and the in-process event bus feeding the admin live stream.

pub mod email;
pub mod events;

pub use email::EmailClient;
pub use events::{EventBus, TicketEvent};

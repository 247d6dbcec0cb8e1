// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin authentication for mailroom.
//!
//! Three concerns live here: constant-time verification of the shared
//! admin secret, opaque bearer sessions with inactivity and absolute
//! lifetimes, and rolling-window rate limiting for abuse-prone actions.
//! Everything fails closed: a storage error during validation is an
//! error, never a pass.

pub mod credential;
pub mod rate_limit;
pub mod session;

pub use credential::verify_admin_secret;
pub use rate_limit::{
    ACTION_CONTACT, ACTION_LOGIN, RateLimiter, RatePolicy, UNKNOWN_CLIENT, client_id,
};
pub use session::{SessionManager, SessionPolicy, SessionState};

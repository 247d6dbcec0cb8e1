// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for mailroom.
//!
//! Thin axum shell over the `TicketDesk`: public contact and thread
//! endpoints, the admin API behind cookie/header auth middleware, and an
//! SSE stream of live ticket events.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{GatewayState, ServerConfig, router, start_server};

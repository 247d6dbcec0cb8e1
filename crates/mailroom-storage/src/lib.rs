// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Mailroom contact backend.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed CRUD
//! operations for tickets, conversation threads, admin sessions, and
//! rate-limit counters. The cross-request atomicity the lifecycle code
//! relies on (atomic increment-and-read, conditional status updates) is
//! provided here as single SQL statements on the single writer thread.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;

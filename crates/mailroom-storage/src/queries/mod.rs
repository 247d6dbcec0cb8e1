// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod rate_limit;
pub mod sessions;
pub mod threads;
pub mod tickets;

// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Constant-time admin secret verification.
//!
//! The comparison of equal-length secrets runs in time independent of the
//! first mismatching byte position, so an attacker cannot recover the
//! secret byte-by-byte from response timing. An unconfigured expected
//! secret is a distinct fail-closed condition, never an open door.

use mailroom_core::MailroomError;
use ring::constant_time::verify_slices_are_equal;

/// Verify a submitted admin secret against the configured one.
///
/// Returns `NotConfigured` when no expected secret is set (deployment
/// error, surfaced distinctly) and `AccessDenied` on any mismatch. Both
/// inputs are trimmed before comparison, matching how the secret is
/// entered in the admin console.
pub fn verify_admin_secret(
    provided: &str,
    expected: Option<&str>,
) -> Result<(), MailroomError> {
    let expected = match expected {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return Err(MailroomError::NotConfigured("admin.secret".to_string())),
    };

    let provided = provided.trim();
    if provided.is_empty() || provided.len() != expected.len() {
        // Length is observable from the comparison either way; only byte
        // positions within equal-length inputs need constant-time handling.
        return Err(MailroomError::AccessDenied);
    }

    verify_slices_are_equal(provided.as_bytes(), expected.as_bytes())
        .map_err(|_| MailroomError::AccessDenied)
}

// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input validation for contact submissions and thread messages.
//!
//! Every error names the offending field. Validation normalizes as it
//! checks: returned values are trimmed, and nothing is persisted until
//! every field has passed.

use std::sync::LazyLock;

use regex::Regex;

use mailroom_core::{MailroomError, NewTicket};

/// Minimal shape check, not RFC 5322: one `@`, a dot in the domain,
/// no whitespace anywhere.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"));

pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 10_000;
/// Visitor thread messages may run longer than admin ones.
pub const THREAD_VISITOR_MAX_CHARS: usize = 5_000;
pub const THREAD_ADMIN_MAX_CHARS: usize = 4_000;

/// Check and normalize a contact submission. Fields come back trimmed;
/// an absent or blank package type becomes `"not specified"`.
pub fn validate_contact(raw: &NewTicket) -> Result<NewTicket, MailroomError> {
    let name = raw.name.trim();
    if name.is_empty() {
        return Err(MailroomError::validation("name", "name is required"));
    }

    let email = raw.email.trim();
    if email.is_empty() {
        return Err(MailroomError::validation("email", "email is required"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(MailroomError::validation("email", "invalid email address"));
    }

    let message = raw.message.trim();
    if message.is_empty() {
        return Err(MailroomError::validation("message", "message is required"));
    }
    let chars = message.chars().count();
    if chars < MESSAGE_MIN_CHARS {
        return Err(MailroomError::validation(
            "message",
            format!("message must be at least {MESSAGE_MIN_CHARS} characters"),
        ));
    }
    if chars > MESSAGE_MAX_CHARS {
        return Err(MailroomError::validation(
            "message",
            format!("message must be at most {MESSAGE_MAX_CHARS} characters"),
        ));
    }

    let package_type = raw
        .package_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("not specified");

    Ok(NewTicket {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
        package_type: Some(package_type.to_string()),
    })
}

/// Check and trim one thread message body. Admin messages have a tighter
/// length ceiling than visitor messages.
pub fn validate_thread_content(raw: &str, is_from_admin: bool) -> Result<String, MailroomError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(MailroomError::validation("content", "content is required"));
    }
    let max = if is_from_admin {
        THREAD_ADMIN_MAX_CHARS
    } else {
        THREAD_VISITOR_MAX_CHARS
    };
    if content.chars().count() > max {
        return Err(MailroomError::validation(
            "content",
            format!("content must be at most {max} characters"),
        ));
    }
    Ok(content.to_string())
}

/// Thread keys are opaque but must be present and short enough to index.
pub fn validate_session_key(raw: &str) -> Result<String, MailroomError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(MailroomError::validation(
            "user_session",
            "user_session is required",
        ));
    }
    if key.chars().count() > 128 {
        return Err(MailroomError::validation(
            "user_session",
            "user_session must be at most 128 characters",
        ));
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, email: &str, message: &str) -> NewTicket {
        NewTicket {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            package_type: None,
        }
    }

    #[test]
    fn trims_and_defaults_the_package_type() {
        let out = validate_contact(&raw(
            "  Ada  ",
            " ada@example.com ",
            "  I would like a quote.  ",
        ))
        .unwrap();
        assert_eq!(out.name, "Ada");
        assert_eq!(out.email, "ada@example.com");
        assert_eq!(out.message, "I would like a quote.");
        assert_eq!(out.package_type.as_deref(), Some("not specified"));
    }

    #[test]
    fn rejects_blank_required_fields_by_name() {
        let err = validate_contact(&raw("   ", "ada@example.com", "long enough body")).unwrap_err();
        let MailroomError::Validation { field, .. } = err else {
            panic!("expected Validation, got {err:?}");
        };
        assert_eq!(field, "name");

        let err = validate_contact(&raw("Ada", "  ", "long enough body")).unwrap_err();
        let MailroomError::Validation { field, .. } = err else {
            panic!("expected Validation, got {err:?}");
        };
        assert_eq!(field, "email");
    }

    #[test]
    fn rejects_malformed_email_shapes() {
        for bad in ["no-at-sign.example.com", "two@@example.com", "a b@example.com", "a@nodot"] {
            assert!(
                validate_contact(&raw("Ada", bad, "long enough body")).is_err(),
                "{bad} should be rejected"
            );
        }
        assert!(validate_contact(&raw("Ada", "a@b.co", "long enough body")).is_ok());
    }

    #[test]
    fn enforces_message_length_bounds() {
        assert!(validate_contact(&raw("Ada", "ada@example.com", "too short")).is_err());
        assert!(validate_contact(&raw("Ada", "ada@example.com", "exactly10!")).is_ok());
        let huge = "x".repeat(MESSAGE_MAX_CHARS + 1);
        assert!(validate_contact(&raw("Ada", "ada@example.com", &huge)).is_err());
    }

    #[test]
    fn thread_limits_differ_by_sender() {
        let visitor = "x".repeat(4_500);
        assert!(validate_thread_content(&visitor, false).is_ok());
        assert!(validate_thread_content(&visitor, true).is_err());
        assert!(validate_thread_content("   ", false).is_err());
    }

    #[test]
    fn session_keys_must_be_present_and_bounded() {
        assert_eq!(validate_session_key(" sess-1 ").unwrap(), "sess-1");
        assert!(validate_session_key("").is_err());
        assert!(validate_session_key(&"s".repeat(129)).is_err());
    }
}

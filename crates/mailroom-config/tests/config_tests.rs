// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Mailroom configuration system.

use mailroom_config::diagnostic::{ConfigError, suggest_key};
use mailroom_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_mailroom_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 3000
log_level = "debug"

[admin]
secret = "hunter2-but-long"

[storage]
database_path = "/tmp/mailroom-test.db"
wal_mode = false

[email]
service_id = "service_abc"
public_key = "pk_123"
private_key = "sk_456"
template_auto_reply = "tmpl_auto"
template_admin_reply = "tmpl_reply"
template_admin_notice = "tmpl_notice"
admin_email = "owner@example.com"
timeout_secs = 5

[limits]
contact_max = 3
contact_window_secs = 1800
login_max = 10
login_window_secs = 300

[session]
ttl_secs = 3600
inactivity_secs = 900
refresh_after_secs = 30
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.admin.secret.as_deref(), Some("hunter2-but-long"));
    assert_eq!(config.storage.database_path, "/tmp/mailroom-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.email.service_id.as_deref(), Some("service_abc"));
    assert_eq!(config.email.admin_email.as_deref(), Some("owner@example.com"));
    assert_eq!(config.email.timeout_secs, 5);
    assert_eq!(config.limits.contact_max, 3);
    assert_eq!(config.limits.login_window_secs, 300);
    assert_eq!(config.session.ttl_secs, 3600);
    assert_eq!(config.session.inactivity_secs, 900);
}

/// Unknown field in a section produces an error that names the bad key.
#[test]
fn unknown_field_in_admin_produces_error() {
    let toml = r#"
[admin]
secert = "whoops"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("secert"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// load_and_validate_str surfaces unknown keys as ConfigError diagnostics.
#[test]
fn unknown_key_becomes_diagnostic_with_suggestion() {
    let errors = load_and_validate_str(
        r#"
[storage]
databse_path = "/tmp/x.db"
"#,
    )
    .expect_err("should produce diagnostics");

    let has_unknown = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "databse_path" && suggestion.as_deref() == Some("database_path")
        ) || matches!(e, ConfigError::Other(_))
    });
    assert!(has_unknown, "expected unknown-key diagnostic, got: {errors:?}");
}

/// Semantic validation runs after successful deserialization.
#[test]
fn semantic_validation_rejects_zero_login_max() {
    let errors = load_and_validate_str(
        r#"
[limits]
login_max = 0
"#,
    )
    .expect_err("zero ceiling should fail validation");
    assert!(
        errors.iter().any(|e| format!("{e}").contains("login_max")),
        "expected login_max validation error, got: {errors:?}"
    );
}

/// Fuzzy suggestion machinery is exposed and behaves sensibly.
#[test]
fn suggest_key_finds_close_match() {
    let valid = ["contact_max", "contact_window_secs", "login_max"];
    assert_eq!(
        suggest_key("contact_mx", &valid),
        Some("contact_max".to_string())
    );
}

// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, positive windows, and
//! non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::MailroomConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MailroomConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if let Some(secret) = &config.admin.secret
        && secret.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "admin.secret must not be blank; unset it instead".to_string(),
        });
    }

    if config.email.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "email.timeout_secs must be positive".to_string(),
        });
    }

    for (key, value) in [
        ("limits.contact_window_secs", config.limits.contact_window_secs),
        ("limits.login_window_secs", config.limits.login_window_secs),
        ("session.ttl_secs", config.session.ttl_secs),
        ("session.inactivity_secs", config.session.inactivity_secs),
        ("session.refresh_after_secs", config.session.refresh_after_secs),
    ] {
        if value <= 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be positive, got {value}"),
            });
        }
    }

    for (key, value) in [
        ("limits.contact_max", config.limits.contact_max),
        ("limits.login_max", config.limits.login_max),
    ] {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be at least 1"),
            });
        }
    }

    if config.session.inactivity_secs > config.session.ttl_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.inactivity_secs ({}) must not exceed session.ttl_secs ({})",
                config.session.inactivity_secs, config.session.ttl_secs
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

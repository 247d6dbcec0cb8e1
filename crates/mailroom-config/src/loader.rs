// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./mailroom.toml` > `~/.config/mailroom/mailroom.toml`
//! > `/etc/mailroom/mailroom.toml` with environment variable overrides via
//! the `MAILROOM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MailroomConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mailroom/mailroom.toml` (system-wide)
/// 3. `~/.config/mailroom/mailroom.toml` (user XDG config)
/// 4. `./mailroom.toml` (local directory)
/// 5. `MAILROOM_*` environment variables
pub fn load_config() -> Result<MailroomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MailroomConfig::default()))
        .merge(Toml::file("/etc/mailroom/mailroom.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("mailroom/mailroom.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("mailroom.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Useful for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<MailroomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MailroomConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MailroomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MailroomConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Top-level config sections an env var key may address.
const SECTIONS: &[&str] = &["server", "admin", "storage", "email", "limits", "session"];

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MAILROOM_STORAGE_DATABASE_PATH` must
/// map to `storage.database_path`, not `storage.database.path`. Only the
/// leading section name becomes a dot; a section name appearing later in
/// the key (`MAILROOM_EMAIL_TEMPLATE_ADMIN_REPLY`) is left alone.
fn env_provider() -> Env {
    Env::prefixed("MAILROOM_").map(|key| {
        // The closure sees the raw env var name with only the prefix
        // stripped; figment lowercases after mapping, not before.
        let key = key.as_str().to_ascii_lowercase();
        for section in SECTIONS {
            if let Some(rest) = key
                .strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key.into()
    })
}

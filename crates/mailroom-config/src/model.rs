// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mailroom contact backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Mailroom configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the admin secret and email credentials have NO defaults so
/// protected endpoints fail closed until the deployment sets them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailroomConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Admin authentication settings.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound transactional email settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// Rate-limit windows and ceilings.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Admin session expiry settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Admin authentication configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Shared admin secret. Unset means every admin endpoint fails closed
    /// with a distinct not-configured error.
    #[serde(default)]
    pub secret: Option<String>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    "mailroom.db".to_string()
}

fn default_true() -> bool {
    true
}

/// Outbound transactional email configuration (EmailJS-compatible REST API).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    /// Provider endpoint accepting the send-email JSON payload.
    #[serde(default = "default_email_api_url")]
    pub api_url: String,

    /// Provider service identifier.
    #[serde(default)]
    pub service_id: Option<String>,

    /// Provider public key (`user_id` in the wire payload).
    #[serde(default)]
    pub public_key: Option<String>,

    /// Provider private key, required for server-side sends.
    #[serde(default)]
    pub private_key: Option<String>,

    /// Template for the visitor auto-reply on ticket creation.
    #[serde(default)]
    pub template_auto_reply: Option<String>,

    /// Template for the admin reply to a ticket.
    #[serde(default)]
    pub template_admin_reply: Option<String>,

    /// Template for notifying the admin of a new thread message.
    #[serde(default)]
    pub template_admin_notice: Option<String>,

    /// Address receiving new-thread-message notifications.
    #[serde(default)]
    pub admin_email: Option<String>,

    /// Bound on each outbound email request, in seconds.
    #[serde(default = "default_email_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: default_email_api_url(),
            service_id: None,
            public_key: None,
            private_key: None,
            template_auto_reply: None,
            template_admin_reply: None,
            template_admin_notice: None,
            admin_email: None,
            timeout_secs: default_email_timeout_secs(),
        }
    }
}

fn default_email_api_url() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_email_timeout_secs() -> u64 {
    10
}

/// Rate-limit windows and ceilings per action class.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Max contact submissions per client within the window.
    #[serde(default = "default_contact_max")]
    pub contact_max: u32,

    /// Contact submission window, in seconds.
    #[serde(default = "default_contact_window_secs")]
    pub contact_window_secs: i64,

    /// Max admin login attempts per client within the window.
    #[serde(default = "default_login_max")]
    pub login_max: u32,

    /// Admin login window, in seconds.
    #[serde(default = "default_login_window_secs")]
    pub login_window_secs: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            contact_max: default_contact_max(),
            contact_window_secs: default_contact_window_secs(),
            login_max: default_login_max(),
            login_window_secs: default_login_window_secs(),
        }
    }
}

fn default_contact_max() -> u32 {
    5
}

fn default_contact_window_secs() -> i64 {
    3600
}

fn default_login_max() -> u32 {
    5
}

fn default_login_window_secs() -> i64 {
    600
}

/// Admin session expiry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Absolute TTL from issuance, extended on refresh, in seconds.
    #[serde(default = "default_session_ttl_secs")]
    pub ttl_secs: i64,

    /// Inactivity ceiling after which a session is destroyed, in seconds.
    #[serde(default = "default_inactivity_secs")]
    pub inactivity_secs: i64,

    /// Minimum idle gap before `last_activity` is rewritten, in seconds.
    /// Keeps validation from writing on every request.
    #[serde(default = "default_refresh_after_secs")]
    pub refresh_after_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl_secs(),
            inactivity_secs: default_inactivity_secs(),
            refresh_after_secs: default_refresh_after_secs(),
        }
    }
}

fn default_session_ttl_secs() -> i64 {
    7200
}

fn default_inactivity_secs() -> i64 {
    1800
}

fn default_refresh_after_secs() -> i64 {
    60
}

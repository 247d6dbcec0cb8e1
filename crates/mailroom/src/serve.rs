// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires the configured components together and runs the gateway.

use std::sync::Arc;

use mailroom_auth::{RateLimiter, RatePolicy, SessionManager, SessionPolicy};
use mailroom_config::MailroomConfig;
use mailroom_core::{MailroomError, SystemClock};
use mailroom_desk::TicketDesk;
use mailroom_gateway::{GatewayState, ServerConfig, start_server};
use mailroom_notify::{EmailClient, EventBus};
use mailroom_storage::Database;

/// Open storage, assemble the desk and auth components, and serve until
/// a shutdown signal arrives.
pub async fn run(config: MailroomConfig) -> Result<(), MailroomError> {
    let db = Database::open(&config.storage.database_path, config.storage.wal_mode).await?;
    tracing::info!(path = %config.storage.database_path, "database ready");

    let clock = Arc::new(SystemClock);
    let events = EventBus::new();
    let email = EmailClient::new(config.email.clone())?;

    let contact_policy = RatePolicy::new(
        config.limits.contact_max,
        config.limits.contact_window_secs,
    );
    let login_policy = RatePolicy::new(config.limits.login_max, config.limits.login_window_secs);
    let session_policy = SessionPolicy::from_secs(
        config.session.ttl_secs,
        config.session.inactivity_secs,
        config.session.refresh_after_secs,
    );

    let desk = TicketDesk::new(
        db.clone(),
        email,
        events.clone(),
        RateLimiter::new(db.clone(), clock.clone()),
        contact_policy,
        clock.clone(),
    );

    let state = GatewayState {
        desk: Arc::new(desk),
        sessions: Arc::new(SessionManager::new(db.clone(), clock.clone(), session_policy)),
        limiter: Arc::new(RateLimiter::new(db, clock)),
        events,
        admin_secret: config.admin.secret.clone(),
        login_policy,
    };

    if state.admin_secret.is_none() {
        tracing::warn!("admin.secret is not set, admin endpoints will fail closed");
    }

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    start_server(&server_config, state).await
}

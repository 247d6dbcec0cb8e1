// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use mailroom_auth::{RateLimiter, RatePolicy, SessionManager};
use mailroom_core::MailroomError;
use mailroom_desk::TicketDesk;
use mailroom_notify::EventBus;

use crate::auth::admin_middleware;
use crate::handlers;
use crate::sse;

/// Shared state for axum request handlers.
///
/// Mirrors the config crate's sections without depending on it; the
/// binary translates `MailroomConfig` into this at startup.
#[derive(Clone)]
pub struct GatewayState {
    pub desk: Arc<TicketDesk>,
    pub sessions: Arc<SessionManager>,
    pub limiter: Arc<RateLimiter>,
    pub events: EventBus,
    /// Shared admin secret; `None` makes every admin request fail closed.
    pub admin_secret: Option<String>,
    pub login_policy: RatePolicy,
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("admin_secret", &self.admin_secret.as_ref().map(|_| "[redacted]"))
            .field("login_policy", &self.login_policy)
            .finish_non_exhaustive()
    }
}

/// Gateway server bind configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the full route tree over the given state.
///
/// Public surface: health, contact submission, visitor thread messages,
/// and admin login (rate-limited inside the handler). Everything under
/// `/admin` except `/admin/auth` sits behind the admin middleware.
pub fn router(state: GatewayState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/contact", post(handlers::post_contact))
        .route("/messages", post(handlers::post_visitor_message))
        .route("/admin/auth", post(handlers::post_admin_auth))
        .with_state(state.clone());

    let admin = Router::new()
        .route("/admin/logout", post(handlers::post_admin_logout))
        .route(
            "/admin/messages",
            get(handlers::get_admin_messages).patch(handlers::patch_admin_message),
        )
        .route("/admin/messages/{id}", delete(handlers::delete_admin_message))
        .route("/admin/messages/{id}/reply", post(handlers::post_admin_reply))
        .route("/admin/threads", get(handlers::get_admin_threads))
        .route(
            "/admin/threads/{session}",
            get(handlers::get_admin_thread).post(handlers::post_admin_thread),
        )
        .route("/admin/events", get(sse::admin_events))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until SIGINT/SIGTERM.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), MailroomError> {
    let app = router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MailroomError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| MailroomError::Internal(format!("gateway server error: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::warn!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events stream of ticket and thread activity.
//!
//! GET /admin/events subscribes the client to the in-process event bus.
//! Delivery is at-most-once: a subscriber that lags far enough to drop
//! events simply misses them and reconciles through the next full list
//! fetch, de-duplicating by entity id.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use tokio::sync::broadcast::error::RecvError;

use crate::server::GatewayState;

/// GET /admin/events
pub async fn admin_events(
    State(state): State<GatewayState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let data = match serde_json::to_string(&event) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("failed to serialize event: {e}");
                            continue;
                        }
                    };
                    return Some((Ok(Event::default().event("ticket").data(data)), rx));
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "sse subscriber lagged, skipping ahead");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

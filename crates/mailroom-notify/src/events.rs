// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process broadcast of ticket and thread activity.
//!
//! Publishing is fire-and-forget: a publish with no live subscribers is
//! not an error, and a slow subscriber that lags the channel simply
//! misses events. Consumers must treat the stream as at-most-once and
//! de-duplicate by entity id if they reconnect.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of the broadcast ring before slow subscribers start lagging.
const CHANNEL_CAPACITY: usize = 64;

/// Something an admin dashboard wants to hear about as it happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TicketEvent {
    /// A visitor submitted a new contact ticket.
    TicketCreated { id: String, name: String },
    /// An admin reply was committed to a ticket.
    TicketReplied { id: String },
    /// A message was appended to a conversation thread.
    ThreadPosted { user_session: String, is_from_admin: bool },
}

/// Clonable handle over one broadcast channel of [`TicketEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TicketEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish an event to whoever is listening right now.
    pub fn publish(&self, event: TicketEvent) {
        // Err only means there are no subscribers at this instant.
        if self.tx.send(event.clone()).is_err() {
            tracing::trace!(?event, "event published with no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TicketEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers, for logging and tests.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(TicketEvent::TicketCreated {
            id: "t-1".to_string(),
            name: "Ada".to_string(),
        });
        bus.publish(TicketEvent::TicketReplied { id: "t-1".to_string() });

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, TicketEvent::TicketCreated { ref id, .. } if id == "t-1"));
        let second = rx.recv().await.unwrap();
        assert_eq!(second, TicketEvent::TicketReplied { id: "t-1".to_string() });
    }

    #[test]
    fn publishing_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(TicketEvent::ThreadPosted {
            user_session: "sess-1".to_string(),
            is_from_admin: false,
        });
    }

    #[test]
    fn events_serialize_with_a_kind_tag() {
        let json = serde_json::to_value(TicketEvent::TicketReplied { id: "t-1".to_string() })
            .unwrap();
        assert_eq!(json["kind"], "ticket_replied");
        assert_eq!(json["id"], "t-1");
    }
}

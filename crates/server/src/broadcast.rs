//! The broadcast layer.
//!
//! Publish/subscribe fan-out keyed by cart ID, plus a global fallback
//! channel so clients that have not subscribed to a specific cart still see
//! cart-existence events. The two targets are independent: the service
//! publishes to each explicitly and tests assert on each separately.
//!
//! Publishing is fire-and-forget. A send with no receivers is not an error,
//! and a slow or disconnected subscriber never rolls back or retries the
//! state mutation that triggered the event.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::broadcast;

use swarmcart_core::{CartId, UserId};

use crate::models::{CartView, Suggestion};

/// Buffered events per subscriber before lagging ones start dropping.
const CHANNEL_CAPACITY: usize = 64;

/// An event pushed to subscribed clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Full enriched cart state after a persisted mutation.
    CartUpdated { cart: CartView },

    /// A single suggestion pushed outside the recomputed list (the
    /// immediate duplicate-detection notice). Lighter weight than a full
    /// cart push and never persisted.
    Suggestion {
        cart_id: CartId,
        suggestion: Suggestion,
    },

    /// Membership changed.
    MemberJoined {
        cart_id: CartId,
        user_id: UserId,
        member_count: usize,
    },
}

/// Per-cart topics plus the global fallback channel.
#[derive(Debug)]
pub struct BroadcastHub {
    global: broadcast::Sender<ServerEvent>,
    topics: Mutex<HashMap<CartId, broadcast::Sender<ServerEvent>>>,
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastHub {
    /// Create a hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (global, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            global,
            topics: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to the global fallback stream.
    #[must_use]
    pub fn subscribe_global(&self) -> broadcast::Receiver<ServerEvent> {
        self.global.subscribe()
    }

    /// Subscribe to one cart's topic, creating it on first use.
    ///
    /// # Panics
    ///
    /// Panics if the topic mutex is poisoned.
    #[must_use]
    pub fn subscribe(&self, cart_id: &CartId) -> broadcast::Receiver<ServerEvent> {
        let mut topics = self.topics.lock().expect("topic map poisoned");
        topics
            .entry(cart_id.clone())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish to one cart's subscribers. No-op when nobody listens.
    ///
    /// # Panics
    ///
    /// Panics if the topic mutex is poisoned.
    pub fn publish_cart(&self, cart_id: &CartId, event: &ServerEvent) {
        let sender = {
            let topics = self.topics.lock().expect("topic map poisoned");
            topics.get(cart_id).cloned()
        };
        if let Some(sender) = sender {
            // Err here just means no active receivers - fire and forget.
            let _ = sender.send(event.clone());
        }
    }

    /// Publish to the global fallback stream.
    pub fn publish_global(&self, event: &ServerEvent) {
        let _ = self.global.send(event.clone());
    }
}

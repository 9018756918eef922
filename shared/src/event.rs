//! Status events - immutable facts recorded after a successful transition

use crate::models::{Actor, OrderStatus};
use crate::util::now_millis;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status update event
///
/// Created exactly once per successful status transition; `old_status` is
/// the status the order actually held immediately before the mutation.
/// Delivery is fire-and-forget: events are never persisted past delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdateEvent {
    /// Event unique ID (duplicate-delivery bookkeeping on the client)
    pub event_id: String,
    /// Order this event belongs to
    pub order_id: String,
    /// Status the order held before the mutation
    pub old_status: OrderStatus,
    /// Status the order holds now
    pub new_status: OrderStatus,
    /// Actor who performed the transition (snapshot for audit)
    pub actor: Actor,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl StatusUpdateEvent {
    /// Build an event for a transition that has just been persisted
    pub fn new(
        order_id: impl Into<String>,
        old_status: OrderStatus,
        new_status: OrderStatus,
        actor: Actor,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            order_id: order_id.into(),
            old_status,
            new_status,
            actor,
            timestamp: now_millis(),
        }
    }
}

/// Broadcast scope an event is delivered to
///
/// Staff share one firehose channel; vendors and customers each get a
/// channel keyed by their own ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "scope", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Staff,
    Vendor(String),
    Customer(String),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Staff => write!(f, "staff"),
            Channel::Vendor(id) => write!(f, "vendor:{}", id),
            Channel::Customer(id) => write!(f, "customer:{}", id),
        }
    }
}

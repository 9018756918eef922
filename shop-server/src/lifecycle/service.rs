//! Transition service - validates and persists status changes
//!
//! The single write path for `Order.status`. Every successful persist
//! emits exactly one [`StatusUpdateEvent`], strictly after the write;
//! nothing is ever published speculatively.

use std::sync::Arc;

use shared::models::{Actor, Order, OrderStatus};
use shared::{AppError, AppResult, StatusUpdateEvent};

use crate::broadcast::StatusBroadcaster;
use crate::lifecycle::policy;
use crate::stores::OrderStore;

/// Order lifecycle state machine front door
#[derive(Clone)]
pub struct LifecycleService {
    orders: Arc<dyn OrderStore>,
    broadcaster: Arc<StatusBroadcaster>,
}

impl LifecycleService {
    pub fn new(orders: Arc<dyn OrderStore>, broadcaster: Arc<StatusBroadcaster>) -> Self {
        Self {
            orders,
            broadcaster,
        }
    }

    /// Attempt to move an order to `requested` on behalf of `actor`
    ///
    /// Flow: read the current status, reject terminal states and edges
    /// missing from the role's table, then persist with a conditional
    /// write keyed on the status that was read. A concurrent writer in
    /// the gap surfaces as `StaleWrite`; the caller re-reads and decides
    /// again rather than retrying blindly.
    pub async fn attempt_transition(
        &self,
        order_id: &str,
        requested: OrderStatus,
        actor: Actor,
    ) -> AppResult<Order> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(order_id))?;
        let current = order.status;

        if current.is_terminal() {
            return Err(AppError::invalid_transition(format!(
                "order {} is {} and accepts no further transitions",
                order_id, current
            )));
        }

        if !policy::can_transition(current, requested, actor.role) {
            return Err(AppError::invalid_transition(format!(
                "{} may not move order {} from {} to {}",
                actor.role, order_id, current, requested
            )));
        }

        let updated = self
            .orders
            .update_status(order_id, current, requested, &actor)
            .await?;

        // Publish strictly after the persist; old_status is the status
        // the order actually held, which the conditional write proved.
        let event = StatusUpdateEvent::new(updated.id.clone(), current, requested, actor);
        let delivered = self.broadcaster.publish(&updated, &event);

        tracing::info!(
            order_id = %updated.id,
            from = %current,
            to = %requested,
            delivered,
            "order transition applied"
        );
        Ok(updated)
    }
}

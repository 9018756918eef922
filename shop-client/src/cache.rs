//! Local order cache for dashboards
//!
//! Holds the confirmed order snapshot as last told by the server, plus a
//! separate overlay of optimistic status changes awaiting their
//! authoritative response. Live status events mutate the confirmed map
//! through a single rule: an event applies only when the cached status
//! equals the event's old status. That one rule makes application
//! idempotent (a re-delivered event no longer matches) and monotone (an
//! event older than the cached state no longer matches), so the live path
//! and the poll fallback can overlap without regressing anything.

use parking_lot::RwLock;
use shared::event::StatusUpdateEvent;
use shared::models::{Order, OrderStatus};
use std::collections::HashMap;

/// What applying a live event did to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Cached status matched the event's old status and was advanced
    Applied,
    /// Cached status already equals the event's new status (duplicate
    /// delivery or a status change the poll fallback got to first)
    AlreadyCurrent,
    /// Cached status matches neither endpoint; the event is older than
    /// the cached state and is dropped
    Stale,
    /// No cached order with that id
    Unknown,
}

/// Thread-safe order cache with an optimistic overlay
///
/// The confirmed map only ever holds server-reported state. Optimistic
/// updates live in the overlay until `confirm_pending` replaces them with
/// the authoritative order or `revert_pending` drops them.
#[derive(Debug, Default)]
pub struct OrderCache {
    confirmed: RwLock<HashMap<String, Order>>,
    pending: RwLock<HashMap<String, OrderStatus>>,
}

impl OrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a single confirmed order
    pub fn insert(&self, order: Order) {
        self.confirmed.write().insert(order.id.clone(), order);
    }

    /// Get an order with any pending overlay applied to its status
    pub fn get(&self, order_id: &str) -> Option<Order> {
        let mut order = self.confirmed.read().get(order_id)?.clone();
        if let Some(status) = self.pending.read().get(order_id) {
            order.status = *status;
        }
        Some(order)
    }

    /// Get the confirmed status, ignoring pending overlays
    pub fn confirmed_status(&self, order_id: &str) -> Option<OrderStatus> {
        self.confirmed.read().get(order_id).map(|order| order.status)
    }

    /// All cached orders with overlays applied, newest first
    pub fn orders(&self) -> Vec<Order> {
        let confirmed = self.confirmed.read();
        let pending = self.pending.read();
        let mut orders: Vec<Order> = confirmed
            .values()
            .map(|order| {
                let mut order = order.clone();
                if let Some(status) = pending.get(&order.id) {
                    order.status = *status;
                }
                order
            })
            .collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        orders
    }

    pub fn len(&self) -> usize {
        self.confirmed.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.read().is_empty()
    }

    /// Apply a live status event to the confirmed snapshot
    pub fn apply(&self, event: &StatusUpdateEvent) -> ApplyOutcome {
        let mut confirmed = self.confirmed.write();
        let Some(order) = confirmed.get_mut(&event.order_id) else {
            return ApplyOutcome::Unknown;
        };
        if order.status == event.new_status {
            return ApplyOutcome::AlreadyCurrent;
        }
        if order.status != event.old_status {
            return ApplyOutcome::Stale;
        }
        order.status = event.new_status;
        order.updated_at = event.timestamp;
        ApplyOutcome::Applied
    }

    /// Overlay a tentative status while a transition request is in flight
    ///
    /// Returns false when no such order is cached.
    pub fn apply_pending(&self, order_id: &str, status: OrderStatus) -> bool {
        let confirmed = self.confirmed.read();
        if !confirmed.contains_key(order_id) {
            return false;
        }
        self.pending.write().insert(order_id.to_string(), status);
        true
    }

    /// Resolve a pending overlay with the authoritative order
    pub fn confirm_pending(&self, order: Order) {
        let mut confirmed = self.confirmed.write();
        let mut pending = self.pending.write();
        pending.remove(&order.id);
        confirmed.insert(order.id.clone(), order);
    }

    /// Drop a pending overlay, falling back to the confirmed status
    pub fn revert_pending(&self, order_id: &str) {
        self.pending.write().remove(order_id);
    }

    /// Whether an order has an unresolved pending overlay
    pub fn has_pending(&self, order_id: &str) -> bool {
        self.pending.read().contains_key(order_id)
    }

    /// Replace the whole snapshot with a fresh server listing
    ///
    /// Pending overlays are cleared: after a wholesale replacement the
    /// server listing is the authority and stale optimism would shadow it.
    pub fn replace_all(&self, orders: Vec<Order>) {
        let mut confirmed = self.confirmed.write();
        let mut pending = self.pending.write();
        *confirmed = orders
            .into_iter()
            .map(|order| (order.id.clone(), order))
            .collect();
        pending.clear();
    }

    /// Replace the snapshot only when it differs from the cached one
    ///
    /// Difference is judged on (id, status) pairs, so a poll taken during
    /// a disconnect window still converges stale statuses. Returns whether
    /// a replacement happened.
    pub fn replace_if_changed(&self, orders: Vec<Order>) -> bool {
        let incoming = signature_of(orders.iter());
        let mut confirmed = self.confirmed.write();
        if signature_of(confirmed.values()) == incoming {
            return false;
        }
        let mut pending = self.pending.write();
        *confirmed = orders
            .into_iter()
            .map(|order| (order.id.clone(), order))
            .collect();
        pending.clear();
        true
    }

    /// (id, status) pairs of the confirmed snapshot, sorted by id
    pub fn signature(&self) -> Vec<(String, OrderStatus)> {
        signature_of(self.confirmed.read().values())
    }
}

fn signature_of<'a>(orders: impl Iterator<Item = &'a Order>) -> Vec<(String, OrderStatus)> {
    let mut signature: Vec<_> = orders
        .map(|order| (order.id.clone(), order.status))
        .collect();
    signature.sort_by(|a, b| a.0.cmp(&b.0));
    signature
}

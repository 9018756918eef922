//! Transition policy - which status changes each role may perform
//!
//! The table is keyed by (current status, actor role) because roles see
//! different slices of the workflow: staff drive the full pipeline and
//! arbitrate cancellation requests, vendors run a shorter fulfilment
//! path without the PREPARING stage, customers may only ask for
//! cancellation while the order is still NEW.
//!
//! Terminal states (DELIVERED, CANCELLED) have no outgoing edges for
//! any role; the tables below never re-enter them.

use shared::models::{ActorRole, OrderStatus};

/// Statuses `role` may move an order to from `status`
///
/// Admin actors share the staff table: their wider visibility is an
/// authorization concern handled upstream, not a different workflow.
pub fn allowed_transitions(status: OrderStatus, role: ActorRole) -> &'static [OrderStatus] {
    use OrderStatus::*;

    match role {
        ActorRole::Staff | ActorRole::Admin => match status {
            New => &[Confirmed, Cancelled],
            Confirmed => &[Preparing, Cancelled],
            Preparing => &[Shipping, Cancelled],
            Shipping => &[Delivered, Cancelled],
            CancellationRequested => &[Cancelled, Confirmed],
            Delivered | Cancelled => &[],
        },
        ActorRole::Vendor => match status {
            New => &[Confirmed, Cancelled],
            Confirmed => &[Shipping, Cancelled],
            Shipping => &[Delivered, Cancelled],
            // Cancellation requests are arbitrated by staff only; a
            // vendor cannot act on them, nor on the PREPARING stage
            // staff inserted into their own pipeline.
            Preparing | CancellationRequested => &[],
            Delivered | Cancelled => &[],
        },
        ActorRole::Customer => match status {
            New => &[CancellationRequested],
            _ => &[],
        },
    }
}

/// True when `role` may move an order from `from` to `to`
pub fn can_transition(from: OrderStatus, to: OrderStatus, role: ActorRole) -> bool {
    allowed_transitions(from, role).contains(&to)
}

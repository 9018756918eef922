//! Status event broadcaster - role-scoped fan-out
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  StatusBroadcaster                   │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │  Channel -> broadcast::Sender<StatusUpdateEvent>│ │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ publish(order, event)
//!          ┌─────────────────┼─────────────────┐
//!          ▼                 ▼                 ▼
//!       staff        vendor:{vendor_id}  customer:{customer_id}
//! ```
//!
//! Delivery is at-most-once, best-effort, non-durable: a subscriber not
//! connected at publish time never receives that event, and nothing is
//! retained or retried. Clients that fall behind see `Lagged` on their
//! receiver and cover the gap through the polling fallback instead.
//!
//! Channels are created lazily on first subscribe. Publishing to a
//! channel nobody ever subscribed to is a debug-logged no-op, so
//! one-off orders do not grow the channel map.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use shared::models::Order;
use shared::{Channel, StatusUpdateEvent};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Capacity of each per-channel broadcast buffer (default: 1024)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Interval between sweeps for channels without receivers
const REAP_INTERVAL: Duration = Duration::from_secs(60);

/// Role-scoped event fan-out
///
/// One tokio broadcast channel per [`Channel`] address. Staff share a
/// single firehose; each vendor and each customer gets a channel keyed
/// by their own ID. The broadcaster holds no per-subscriber state: a
/// dropped receiver simply stops counting.
#[derive(Debug)]
pub struct StatusBroadcaster {
    channels: DashMap<Channel, broadcast::Sender<StatusUpdateEvent>>,
    capacity: usize,
    shutdown_token: CancellationToken,
}

impl StatusBroadcaster {
    /// Create a broadcaster with the default per-channel capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a broadcaster with a specific per-channel capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Subscribe to one channel, creating it if needed
    pub fn subscribe(&self, channel: Channel) -> broadcast::Receiver<StatusUpdateEvent> {
        self.channels
            .entry(channel)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publish one event to every audience of the order
    ///
    /// Audiences: all staff, the order's fulfilling vendor, the order's
    /// owning customer. Returns the number of receivers reached across
    /// all three channels.
    pub fn publish(&self, order: &Order, event: &StatusUpdateEvent) -> usize {
        let targets = [
            Channel::Staff,
            Channel::Vendor(order.vendor_id.clone()),
            Channel::Customer(order.customer_id.clone()),
        ];

        let mut delivered = 0;
        for channel in targets {
            delivered += self.send_to(&channel, event.clone());
        }

        tracing::debug!(
            order_id = %event.order_id,
            old_status = %event.old_status,
            new_status = %event.new_status,
            delivered,
            "status event published"
        );
        delivered
    }

    /// Send one event to one channel; returns receivers reached
    fn send_to(&self, channel: &Channel, event: StatusUpdateEvent) -> usize {
        match self.channels.get(channel) {
            Some(tx) => match tx.send(event) {
                Ok(receivers) => receivers,
                // All receivers dropped since the channel was created
                Err(_) => {
                    tracing::debug!(channel = %channel, "event dropped, no receivers");
                    0
                }
            },
            None => {
                tracing::debug!(channel = %channel, "event dropped, channel never subscribed");
                0
            }
        }
    }

    /// Receivers currently attached to a channel (0 when absent)
    pub fn receiver_count(&self, channel: &Channel) -> usize {
        self.channels
            .get(channel)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Number of channels currently registered
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Drop channels whose last receiver disconnected
    ///
    /// Returns how many channels were removed. A later subscribe simply
    /// recreates the channel.
    pub fn reap_idle_channels(&self) -> usize {
        let before = self.channels.len();
        self.channels.retain(|_, tx| tx.receiver_count() > 0);
        before - self.channels.len()
    }

    /// Spawn the periodic idle-channel sweep, stopped by [`shutdown`]
    ///
    /// [`shutdown`]: StatusBroadcaster::shutdown
    pub fn start_background_tasks(self: &Arc<Self>) {
        let broadcaster = Arc::clone(self);
        let token = self.shutdown_token.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(REAP_INTERVAL);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let reaped = broadcaster.reap_idle_channels();
                        if reaped > 0 {
                            tracing::debug!(reaped, "reaped idle broadcast channels");
                        }
                    }
                }
            }
        });
    }

    /// Token observed by background tasks for shutdown
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// Stop background tasks; in-flight receivers drain on their own
    pub fn shutdown(&self) {
        tracing::info!("Shutting down status broadcaster");
        self.shutdown_token.cancel();
    }
}

impl Default for StatusBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{
        Actor, ActorRole, OrderLine, OrderStatus, PaymentMethod, PaymentStatus, ShippingInfo,
    };

    fn sample_order(customer_id: &str, vendor_id: &str) -> Order {
        Order {
            id: "ord-1".to_string(),
            customer_id: customer_id.to_string(),
            vendor_id: vendor_id.to_string(),
            status: OrderStatus::New,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::CashOnDelivery,
            subtotal: 100_000.0,
            discount_amount: 0.0,
            shipping_fee: 30_000.0,
            total_amount: 130_000.0,
            voucher_code: None,
            shipping_info: ShippingInfo {
                name: "Tran Thi B".to_string(),
                phone: "0901234567".to_string(),
                address: "12 Le Loi".to_string(),
                city: "Da Nang".to_string(),
                ward: "Hai Chau".to_string(),
                notes: None,
            },
            lines: vec![OrderLine {
                product_id: "prod-1".to_string(),
                name: "Mug".to_string(),
                unit_price: 50_000.0,
                quantity: 2,
            }],
            created_at: 0,
            updated_at: 0,
        }
    }

    fn sample_event(order: &Order) -> StatusUpdateEvent {
        StatusUpdateEvent::new(
            order.id.clone(),
            OrderStatus::New,
            OrderStatus::Confirmed,
            Actor::new(ActorRole::Staff, "stf-1", "Staff One"),
        )
    }

    #[tokio::test]
    async fn test_publish_reaches_all_three_audiences() {
        let broadcaster = StatusBroadcaster::new();
        let order = sample_order("cus-1", "ven-1");

        let mut staff_rx = broadcaster.subscribe(Channel::Staff);
        let mut vendor_rx = broadcaster.subscribe(Channel::Vendor("ven-1".to_string()));
        let mut customer_rx = broadcaster.subscribe(Channel::Customer("cus-1".to_string()));

        let event = sample_event(&order);
        let delivered = broadcaster.publish(&order, &event);
        assert_eq!(delivered, 3);

        assert_eq!(staff_rx.recv().await.unwrap().event_id, event.event_id);
        assert_eq!(vendor_rx.recv().await.unwrap().event_id, event.event_id);
        assert_eq!(customer_rx.recv().await.unwrap().event_id, event.event_id);
    }

    #[tokio::test]
    async fn test_publish_skips_unrelated_scopes() {
        let broadcaster = StatusBroadcaster::new();
        let order = sample_order("cus-1", "ven-1");

        let mut other_vendor = broadcaster.subscribe(Channel::Vendor("ven-2".to_string()));
        let mut other_customer = broadcaster.subscribe(Channel::Customer("cus-9".to_string()));

        broadcaster.publish(&order, &sample_event(&order));

        assert!(matches!(
            other_vendor.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
        assert!(matches!(
            other_customer.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let broadcaster = StatusBroadcaster::new();
        let order = sample_order("cus-1", "ven-1");

        let delivered = broadcaster.publish(&order, &sample_event(&order));
        assert_eq!(delivered, 0);
        // Publishing never creates channels
        assert_eq!(broadcaster.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_gets_each_event_at_most_once() {
        let broadcaster = StatusBroadcaster::new();
        let order = sample_order("cus-1", "ven-1");

        let mut staff_rx = broadcaster.subscribe(Channel::Staff);
        let event = sample_event(&order);
        broadcaster.publish(&order, &event);

        assert_eq!(staff_rx.recv().await.unwrap().event_id, event.event_id);
        assert!(matches!(
            staff_rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_disconnected_subscriber_misses_events() {
        let broadcaster = StatusBroadcaster::new();
        let order = sample_order("cus-1", "ven-1");

        let staff_rx = broadcaster.subscribe(Channel::Staff);
        drop(staff_rx);

        // Published while nobody is listening: gone for good
        broadcaster.publish(&order, &sample_event(&order));

        let mut late_rx = broadcaster.subscribe(Channel::Staff);
        assert!(matches!(
            late_rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_reap_removes_only_idle_channels() {
        let broadcaster = StatusBroadcaster::new();

        let _live = broadcaster.subscribe(Channel::Staff);
        let dead = broadcaster.subscribe(Channel::Vendor("ven-1".to_string()));
        drop(dead);

        assert_eq!(broadcaster.channel_count(), 2);
        assert_eq!(broadcaster.reap_idle_channels(), 1);
        assert_eq!(broadcaster.channel_count(), 1);
        assert_eq!(broadcaster.receiver_count(&Channel::Staff), 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_observes_lag_not_blockage() {
        let broadcaster = StatusBroadcaster::with_capacity(2);
        let order = sample_order("cus-1", "ven-1");

        let mut staff_rx = broadcaster.subscribe(Channel::Staff);
        for _ in 0..4 {
            broadcaster.publish(&order, &sample_event(&order));
        }

        // Oldest events were overwritten; receiver learns it lagged
        assert!(matches!(
            staff_rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }
}

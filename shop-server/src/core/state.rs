use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use shared::{Channel, StatusUpdateEvent};

use crate::broadcast::StatusBroadcaster;
use crate::checkout::CheckoutService;
use crate::core::Config;
use crate::lifecycle::LifecycleService;
use crate::payment::{HttpGateway, MockGateway, PaymentGateway};
use crate::stores::{MemoryOrderStore, MemoryVoucherStore, OrderStore, VoucherStore};
use crate::vouchers::VoucherEngine;

/// Server state - shared handles to every service
///
/// Cloning is shallow; every field is either small or `Arc`-backed.
///
/// # Components
///
/// | Field | Description |
/// |-------|-------------|
/// | config | Settings (immutable after startup) |
/// | orders | Order store |
/// | vouchers | Voucher store |
/// | broadcaster | Status update fan-out |
/// | lifecycle | Status transition service |
/// | checkout | Checkout orchestrator |
/// | voucher_engine | Voucher validation and pricing |
///
/// # Example
///
/// ```ignore
/// let state = ServerState::initialize(&config).await;
/// let mut staff_feed = state.subscribe(Channel::Staff);
/// ```
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Order store
    pub orders: Arc<dyn OrderStore>,
    /// Voucher store
    pub vouchers: Arc<dyn VoucherStore>,
    /// Status update fan-out
    pub broadcaster: Arc<StatusBroadcaster>,
    /// Status transition service
    pub lifecycle: LifecycleService,
    /// Checkout orchestrator
    pub checkout: CheckoutService,
    /// Voucher validation and pricing
    pub voucher_engine: VoucherEngine,
}

impl ServerState {
    /// Create server state (manual construction)
    ///
    /// Normally [`initialize()`](Self::initialize) is used instead;
    /// tests use this to inject their own stores or gateway.
    pub fn new(
        config: Config,
        orders: Arc<dyn OrderStore>,
        vouchers: Arc<dyn VoucherStore>,
        broadcaster: Arc<StatusBroadcaster>,
        lifecycle: LifecycleService,
        checkout: CheckoutService,
        voucher_engine: VoucherEngine,
    ) -> Self {
        Self {
            config,
            orders,
            vouchers,
            broadcaster,
            lifecycle,
            checkout,
            voucher_engine,
        }
    }

    /// Initialize server state
    ///
    /// Wires everything up in order:
    /// 1. stores (in-memory)
    /// 2. broadcast fan-out
    /// 3. payment gateway (mock unless an endpoint is configured)
    /// 4. services on top of the above
    pub async fn initialize(config: &Config) -> Self {
        // 1. Stores
        let orders: Arc<dyn OrderStore> = Arc::new(MemoryOrderStore::new());
        let vouchers: Arc<dyn VoucherStore> = Arc::new(MemoryVoucherStore::new());

        // 2. Broadcast fan-out
        let broadcaster = Arc::new(StatusBroadcaster::with_capacity(config.broadcast_capacity));

        // 3. Payment gateway
        let gateway: Arc<dyn PaymentGateway> = if config.payment_gateway_url.is_empty() {
            tracing::warn!("PAYMENT_GATEWAY_URL not set; online payments use the mock provider");
            Arc::new(MockGateway::new())
        } else {
            Arc::new(HttpGateway::new(
                config.payment_gateway_url.clone(),
                Duration::from_millis(config.payment_timeout_ms),
            ))
        };

        // 4. Services
        let lifecycle = LifecycleService::new(orders.clone(), broadcaster.clone());
        let checkout = CheckoutService::new(
            orders.clone(),
            vouchers.clone(),
            gateway,
            config.shipping_fee,
        );
        let voucher_engine = VoucherEngine::new(vouchers.clone());

        Self::new(
            config.clone(),
            orders,
            vouchers,
            broadcaster,
            lifecycle,
            checkout,
            voucher_engine,
        )
    }

    /// Start background tasks
    ///
    /// Must be called before `Server::run()`
    ///
    /// Tasks started:
    /// - idle broadcast channel reaper
    pub async fn start_background_tasks(&self) {
        self.broadcaster.start_background_tasks();
    }

    /// Subscribe to a status update channel
    pub fn subscribe(&self, channel: Channel) -> broadcast::Receiver<StatusUpdateEvent> {
        self.broadcaster.subscribe(channel)
    }

    /// Stop background tasks and wake shutdown-aware components
    pub fn shutdown(&self) {
        self.broadcaster.shutdown();
    }
}

impl fmt::Debug for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("broadcast_channels", &self.broadcaster.channel_count())
            .finish_non_exhaustive()
    }
}

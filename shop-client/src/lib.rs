//! Shop Client - HTTP client and dashboard-side order state
//!
//! Provides network-based HTTP calls to the shop server API, plus the
//! local order cache and the reconciliation agent that dashboards build
//! their live order views on.

pub mod agent;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod http;

pub use agent::SyncAgent;
pub use cache::{ApplyOutcome, OrderCache};
pub use config::ClientConfig;
pub use directory::OrderDirectory;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::ApiResponse;
pub use shared::event::{Channel, StatusUpdateEvent};
pub use shared::models::{
    Actor, ActorRole, CheckoutRequest, CheckoutResponse, Order, OrderFilter, OrderPage,
    OrderStatus, Voucher, VoucherCreate, VoucherQuote,
};

//! Shop Server - commerce order platform core
//!
//! # Architecture overview
//!
//! This crate is the order platform's server: it owns the order
//! lifecycle, prices checkouts, applies voucher discounts and fans
//! status updates out to interested parties.
//!
//! - **Checkout** (`checkout`): cart validation, pricing, voucher
//!   redemption and payment initiation in one orchestrated flow
//! - **Lifecycle** (`lifecycle`): role-aware status transition policy
//!   with optimistic concurrency
//! - **Vouchers** (`vouchers`): eligibility rules and discount math
//! - **Broadcast** (`broadcast`): per-audience status update fan-out
//! - **HTTP API** (`api`): RESTful interface over all of the above
//!
//! # Module structure
//!
//! ```text
//! shop-server/src/
//! ├── core/        # configuration, state, server, errors
//! ├── api/         # HTTP routes and handlers
//! ├── services/    # router assembly, access log
//! ├── checkout/    # checkout orchestration
//! ├── lifecycle/   # transition policy and service
//! ├── vouchers/    # discount rules and pricing
//! ├── payment/     # payment gateway providers
//! ├── broadcast/   # status update fan-out
//! ├── stores/      # order and voucher storage
//! ├── money.rs     # decimal arithmetic and validation
//! └── utils/       # logging
//! ```

pub mod api;
pub mod broadcast;
pub mod checkout;
pub mod core;
pub mod lifecycle;
pub mod money;
pub mod payment;
pub mod services;
pub mod stores;
pub mod utils;
pub mod vouchers;

// Re-export public types
pub use broadcast::StatusBroadcaster;
pub use checkout::{CheckoutRequest, CheckoutResponse, CheckoutService};
pub use core::{Config, Server, ServerState};
pub use lifecycle::LifecycleService;
pub use vouchers::{VoucherEngine, VoucherQuote};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Rolling log files older than this are removed on startup
const LOG_RETENTION_DAYS: u64 = 30;

/// Prepare the process environment: dotenv, logging, log housekeeping
///
/// Reads `LOG_LEVEL`, `LOG_JSON` and `LOG_DIR`; when a log directory is
/// configured, stale rolling files are cleaned up before logging starts
/// writing new ones.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_json = std::env::var("LOG_JSON").ok().and_then(|v| v.parse().ok());
    let log_dir = std::env::var("LOG_DIR").ok();

    if let Some(dir) = &log_dir {
        utils::logger::cleanup_old_logs(dir, LOG_RETENTION_DAYS)?;
    }

    utils::logger::init_logger_with_file(log_level.as_deref(), log_json, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_  ____  ____
  \__ \/ __ \/ __ \/ __ \
 ___/ / / / / /_/ / /_/ /
/____/_/ /_/\____/ .___/
   _____         /_/
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}

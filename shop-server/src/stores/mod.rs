//! Storage layer - opaque order and voucher stores
//!
//! The rest of the server talks to storage through these traits only.
//! The bundled implementation is in-memory ([`memory`]); a durable
//! backend slots in behind the same contracts.
//!
//! # Contracts
//!
//! | Operation | Concurrency guarantee |
//! |-----------|-----------------------|
//! | `OrderStore::update_status` | conditional write; succeeds only while the stored status still equals the expected one |
//! | `VoucherStore::reserve_use` | atomic increment; never pushes `used_count` past `usage_limit` |
//! | `VoucherStore::release_use` | compensation for a reservation whose checkout did not complete |

mod memory;

pub use memory::{MemoryOrderStore, MemoryVoucherStore};

use async_trait::async_trait;
use shared::AppResult;
use shared::models::{Actor, Order, OrderFilter, OrderPage, OrderStatus, Voucher};

/// Order persistence contract
#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
    /// Persist a freshly created order
    async fn insert(&self, order: Order) -> AppResult<Order>;

    /// Fetch one order by ID
    async fn get(&self, id: &str) -> AppResult<Option<Order>>;

    /// List orders matching `filter`, newest first
    async fn list(&self, filter: &OrderFilter, limit: usize, offset: usize)
    -> AppResult<OrderPage>;

    /// Conditionally persist a status change
    ///
    /// The write succeeds only while the stored status still equals
    /// `expected`; a concurrent writer that got there first causes a
    /// `StaleWrite` error. `actor` is recorded for audit logging only.
    async fn update_status(
        &self,
        id: &str,
        expected: OrderStatus,
        next: OrderStatus,
        actor: &Actor,
    ) -> AppResult<Order>;
}

/// Voucher persistence contract
#[async_trait]
pub trait VoucherStore: Send + Sync + 'static {
    /// Persist a new voucher; the code must be unique
    async fn insert(&self, voucher: Voucher) -> AppResult<Voucher>;

    /// Fetch one voucher by ID
    async fn get(&self, id: i64) -> AppResult<Option<Voucher>>;

    /// Fetch one voucher by its redemption code
    async fn get_by_code(&self, code: &str) -> AppResult<Option<Voucher>>;

    /// All vouchers, unfiltered
    async fn list(&self) -> AppResult<Vec<Voucher>>;

    /// Atomically consume one use
    ///
    /// Fails with `VoucherExhausted` when `used_count` has already
    /// reached `usage_limit`; winners of the last slot proceed, losers
    /// get the error even if their earlier validation read passed.
    async fn reserve_use(&self, code: &str) -> AppResult<Voucher>;

    /// Return a previously reserved use (checkout compensation)
    ///
    /// Best-effort: a missing voucher is logged and ignored so the
    /// caller's own error is the one that surfaces.
    async fn release_use(&self, code: &str) -> AppResult<()>;
}

//! In-memory store implementations backed by DashMap
//!
//! Per-entry mutations take the map's shard lock for that key, which is
//! exactly the granularity the contracts need: two writers on the same
//! order serialize, writers on distinct orders never contend.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::{Actor, Order, OrderFilter, OrderPage, OrderStatus, Voucher};
use shared::util::now_millis;
use shared::{AppError, AppResult};

use super::{OrderStore, VoucherStore};

/// Order store holding everything in process memory
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: DashMap<String, Order>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: Order) -> AppResult<Order> {
        if self.orders.contains_key(&order.id) {
            return Err(AppError::already_exists(format!("order {}", order.id)));
        }
        self.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn get(&self, id: &str) -> AppResult<Option<Order>> {
        Ok(self.orders.get(id).map(|entry| entry.clone()))
    }

    async fn list(
        &self,
        filter: &OrderFilter,
        limit: usize,
        offset: usize,
    ) -> AppResult<OrderPage> {
        let mut matching: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.clone())
            .collect();

        // Newest first; ID breaks ties so pagination is stable
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len();
        let items: Vec<Order> = matching.into_iter().skip(offset).take(limit).collect();
        Ok(OrderPage { items, total })
    }

    async fn update_status(
        &self,
        id: &str,
        expected: OrderStatus,
        next: OrderStatus,
        actor: &Actor,
    ) -> AppResult<Order> {
        // get_mut holds the shard lock for this key, making the
        // compare-and-set below atomic with respect to other writers.
        let mut entry = self
            .orders
            .get_mut(id)
            .ok_or_else(|| AppError::order_not_found(id))?;

        if entry.status != expected {
            tracing::debug!(
                order_id = %id,
                expected = %expected,
                actual = %entry.status,
                actor = %actor.role,
                "conditional status write lost the race"
            );
            return Err(AppError::stale_write(id));
        }

        entry.status = next;
        entry.updated_at = now_millis();
        tracing::debug!(
            order_id = %id,
            from = %expected,
            to = %next,
            actor_role = %actor.role,
            actor_id = %actor.id,
            "order status persisted"
        );
        Ok(entry.clone())
    }
}

/// Voucher store holding everything in process memory
#[derive(Debug, Default)]
pub struct MemoryVoucherStore {
    vouchers: DashMap<String, Voucher>,
}

impl MemoryVoucherStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoucherStore for MemoryVoucherStore {
    async fn insert(&self, voucher: Voucher) -> AppResult<Voucher> {
        if self.vouchers.contains_key(&voucher.code) {
            return Err(AppError::already_exists(format!(
                "voucher {}",
                voucher.code
            )));
        }
        self.vouchers.insert(voucher.code.clone(), voucher.clone());
        Ok(voucher)
    }

    async fn get(&self, id: i64) -> AppResult<Option<Voucher>> {
        // Keyed by code, so ID lookup scans; voucher counts are small.
        Ok(self
            .vouchers
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.clone()))
    }

    async fn get_by_code(&self, code: &str) -> AppResult<Option<Voucher>> {
        Ok(self.vouchers.get(code).map(|entry| entry.clone()))
    }

    async fn list(&self) -> AppResult<Vec<Voucher>> {
        let mut all: Vec<Voucher> = self.vouchers.iter().map(|entry| entry.clone()).collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(all)
    }

    async fn reserve_use(&self, code: &str) -> AppResult<Voucher> {
        let mut entry = self
            .vouchers
            .get_mut(code)
            .ok_or_else(|| AppError::voucher_not_found(code))?;

        // Re-checked under the entry lock: the validation read that let
        // the caller get this far may have raced another redemption.
        if entry.used_count >= entry.usage_limit {
            return Err(AppError::voucher_exhausted(code));
        }

        entry.used_count += 1;
        Ok(entry.clone())
    }

    async fn release_use(&self, code: &str) -> AppResult<()> {
        match self.vouchers.get_mut(code) {
            Some(mut entry) => {
                entry.used_count = entry.used_count.saturating_sub(1);
                Ok(())
            }
            None => {
                tracing::warn!(code = %code, "release_use on unknown voucher, ignoring");
                Ok(())
            }
        }
    }
}

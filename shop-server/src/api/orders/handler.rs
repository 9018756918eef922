//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use shared::error::ErrorCategory;
use shared::models::{Actor, Order, OrderFilter, OrderPage, OrderStatus};
use shared::{ApiResponse, AppError, AppResult};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    pub customer_id: Option<String>,
    pub vendor_id: Option<String>,
    pub status: Option<OrderStatus>,
}

fn default_limit() -> usize {
    50
}

/// List orders matching the query, newest first
///
/// A listing read that fails inside the store is retried once before
/// the error propagates. Mutating operations are never auto-retried.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<OrderPage>> {
    let filter = OrderFilter {
        customer_id: query.customer_id,
        vendor_id: query.vendor_id,
        status: query.status,
    };
    let page = match state.orders.list(&filter, query.limit, query.offset).await {
        Ok(page) => page,
        Err(err) if err.code.category() == ErrorCategory::System => {
            tracing::warn!(code = err.code.code(), "order listing failed, retrying once");
            state.orders.list(&filter, query.limit, query.offset).await?
        }
        Err(err) => return Err(err),
    };
    Ok(ApiResponse::success(page))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = state
        .orders
        .get(&id)
        .await?
        .ok_or_else(|| AppError::order_not_found(&id))?;
    Ok(ApiResponse::success(order))
}

/// Status transition request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    pub actor: Actor,
}

/// Move an order to a new status
///
/// The transition policy decides whether this actor may take this edge;
/// a concurrent writer that got there first surfaces as a conflict.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<Order>> {
    let order = state
        .lifecycle
        .attempt_transition(&id, payload.status, payload.actor)
        .await?;
    Ok(ApiResponse::success(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::broadcast::StatusBroadcaster;
    use crate::checkout::CheckoutService;
    use crate::core::Config;
    use crate::lifecycle::LifecycleService;
    use crate::payment::MockGateway;
    use crate::stores::{MemoryOrderStore, MemoryVoucherStore, OrderStore, VoucherStore};
    use crate::vouchers::VoucherEngine;
    use shared::ErrorCode;

    /// Order store whose next `failures_left` list calls fail
    struct FlakyOrderStore {
        inner: MemoryOrderStore,
        failures_left: AtomicUsize,
    }

    impl FlakyOrderStore {
        fn failing(times: usize) -> Arc<Self> {
            Arc::new(Self {
                inner: MemoryOrderStore::new(),
                failures_left: AtomicUsize::new(times),
            })
        }
    }

    #[async_trait]
    impl OrderStore for FlakyOrderStore {
        async fn insert(&self, order: Order) -> AppResult<Order> {
            self.inner.insert(order).await
        }

        async fn get(&self, id: &str) -> AppResult<Option<Order>> {
            self.inner.get(id).await
        }

        async fn list(
            &self,
            filter: &OrderFilter,
            limit: usize,
            offset: usize,
        ) -> AppResult<OrderPage> {
            let fail = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if fail {
                return Err(AppError::upstream("order store", "simulated read failure"));
            }
            self.inner.list(filter, limit, offset).await
        }

        async fn update_status(
            &self,
            id: &str,
            expected: OrderStatus,
            next: OrderStatus,
            actor: &Actor,
        ) -> AppResult<Order> {
            self.inner.update_status(id, expected, next, actor).await
        }
    }

    fn state_with(orders: Arc<dyn OrderStore>) -> ServerState {
        let config = Config::with_overrides(0, 30_000.0, 8);
        let vouchers: Arc<dyn VoucherStore> = Arc::new(MemoryVoucherStore::new());
        let broadcaster = Arc::new(StatusBroadcaster::with_capacity(config.broadcast_capacity));
        let lifecycle = LifecycleService::new(orders.clone(), broadcaster.clone());
        let checkout = CheckoutService::new(
            orders.clone(),
            vouchers.clone(),
            Arc::new(MockGateway::new()),
            config.shipping_fee,
        );
        let engine = VoucherEngine::new(vouchers.clone());
        ServerState::new(config, orders, vouchers, broadcaster, lifecycle, checkout, engine)
    }

    fn default_query() -> ListQuery {
        ListQuery {
            limit: 50,
            offset: 0,
            customer_id: None,
            vendor_id: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_list_retries_one_failed_read() {
        let state = state_with(FlakyOrderStore::failing(1));

        let response = list(State(state), Query(default_query())).await.unwrap();
        assert_eq!(response.data.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_list_gives_up_after_the_retry() {
        let state = state_with(FlakyOrderStore::failing(2));

        let err = list(State(state), Query(default_query())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UpstreamFailure);
    }
}

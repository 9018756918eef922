//! Order listing seam for the reconciliation agent

use crate::error::ClientResult;
use crate::http::HttpClient;
use async_trait::async_trait;
use shared::models::{OrderFilter, OrderPage};

/// Source of order listings for reconciliation
///
/// The agent polls through this seam so tests can reconcile against an
/// in-memory directory instead of a live server.
#[async_trait]
pub trait OrderDirectory: Send + Sync + 'static {
    /// List orders matching a filter, newest first
    async fn list_orders(
        &self,
        filter: &OrderFilter,
        limit: usize,
        offset: usize,
    ) -> ClientResult<OrderPage>;
}

#[async_trait]
impl OrderDirectory for HttpClient {
    async fn list_orders(
        &self,
        filter: &OrderFilter,
        limit: usize,
        offset: usize,
    ) -> ClientResult<OrderPage> {
        HttpClient::list_orders(self, filter, limit, offset).await
    }
}

//! HTTP client for the shop server REST API

use crate::{ApiResponse, ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::models::{
    Actor, CheckoutRequest, CheckoutResponse, Order, OrderFilter, OrderPage, OrderStatus, Voucher,
    VoucherCreate, VoucherQuote,
};

/// HTTP client for making network requests to the shop server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: serde::Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.patch(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    ///
    /// Error bodies carry the standard API envelope; anything else (a proxy
    /// error page, a plain-text panic) falls back to the raw body text with
    /// the HTTP status as the code.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let (code, message) =
                match serde_json::from_str::<ApiResponse<serde_json::Value>>(&text) {
                    Ok(body) => (body.code.unwrap_or(status.as_u16()), body.message),
                    Err(_) => (status.as_u16(), text),
                };
            return match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(message)),
                StatusCode::CONFLICT => Err(ClientError::Conflict(message)),
                _ => Err(ClientError::Api { code, message }),
            };
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Checkout API ==========

    /// Place an order
    pub async fn checkout(&self, request: &CheckoutRequest) -> ClientResult<CheckoutResponse> {
        self.post::<ApiResponse<CheckoutResponse>, _>("/api/checkout", request)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing checkout data".to_string()))
    }

    // ========== Order API ==========

    /// Get a single order by id
    pub async fn get_order(&self, order_id: &str) -> ClientResult<Order> {
        self.get::<ApiResponse<Order>>(&format!("/api/orders/{}", order_id))
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing order data".to_string()))
    }

    /// List orders matching a filter, newest first
    pub async fn list_orders(
        &self,
        filter: &OrderFilter,
        limit: usize,
        offset: usize,
    ) -> ClientResult<OrderPage> {
        #[derive(serde::Serialize)]
        struct ListQuery<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            customer_id: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            vendor_id: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            status: Option<OrderStatus>,
            limit: usize,
            offset: usize,
        }

        let query = ListQuery {
            customer_id: filter.customer_id.as_deref(),
            vendor_id: filter.vendor_id.as_deref(),
            status: filter.status,
            limit,
            offset,
        };

        self.get_with_query::<ApiResponse<OrderPage>, _>("/api/orders", &query)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing order page".to_string()))
    }

    /// Request a status transition on an order
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        actor: &Actor,
    ) -> ClientResult<Order> {
        #[derive(serde::Serialize)]
        struct UpdateStatusRequest<'a> {
            status: OrderStatus,
            actor: &'a Actor,
        }

        let request = UpdateStatusRequest { status, actor };

        self.patch::<ApiResponse<Order>, _>(&format!("/api/orders/{}/status", order_id), &request)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing order data".to_string()))
    }

    // ========== Voucher API ==========

    /// Create a voucher
    pub async fn create_voucher(&self, request: &VoucherCreate) -> ClientResult<Voucher> {
        self.post::<ApiResponse<Voucher>, _>("/api/vouchers", request)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing voucher data".to_string()))
    }

    /// List all vouchers
    pub async fn list_vouchers(&self) -> ClientResult<Vec<Voucher>> {
        self.get::<ApiResponse<Vec<Voucher>>>("/api/vouchers")
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing voucher list".to_string()))
    }

    /// Get a single voucher by id
    pub async fn get_voucher(&self, id: i64) -> ClientResult<Voucher> {
        self.get::<ApiResponse<Voucher>>(&format!("/api/vouchers/{}", id))
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing voucher data".to_string()))
    }

    /// Preview what a voucher is worth against an order value
    pub async fn quote_voucher(&self, code: &str, order_value: f64) -> ClientResult<VoucherQuote> {
        #[derive(serde::Serialize)]
        struct QuoteRequest<'a> {
            code: &'a str,
            order_value: f64,
        }

        let request = QuoteRequest { code, order_value };

        self.post::<ApiResponse<VoucherQuote>, _>("/api/vouchers/quote", &request)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing quote data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ActorRole;

    #[test]
    fn test_url_join_handles_trailing_slash() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:3000/"));
        assert_eq!(
            client.url("/api/orders"),
            "http://localhost:3000/api/orders"
        );

        let client = HttpClient::new(&ClientConfig::new("http://localhost:3000"));
        assert_eq!(
            client.url("/api/orders"),
            "http://localhost:3000/api/orders"
        );
    }

    #[test]
    fn test_update_status_wire_shape() {
        #[derive(serde::Serialize)]
        struct UpdateStatusRequest<'a> {
            status: OrderStatus,
            actor: &'a Actor,
        }

        let actor = Actor::new(ActorRole::Staff, "staff-1", "Ana");
        let json = serde_json::to_value(UpdateStatusRequest {
            status: OrderStatus::Confirmed,
            actor: &actor,
        })
        .unwrap();

        assert_eq!(json["status"], "CONFIRMED");
        assert_eq!(json["actor"]["role"], "STAFF");
        assert_eq!(json["actor"]["id"], "staff-1");
    }
}

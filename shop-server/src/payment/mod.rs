//! Payment Gateway
//!
//! Outbound contract for starting an online payment session. Checkout
//! calls [`PaymentGateway::initiate`] for online orders only; cash on
//! delivery never touches this module.
//!
//! Two implementations ship: [`HttpGateway`] posts to a real provider
//! endpoint, [`MockGateway`] answers locally and records what it was
//! asked (used when no endpoint is configured, and in tests).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult};
use uuid::Uuid;

/// What the provider needs to open a payment session
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub order_id: String,
    /// Amount to collect, in currency units
    pub amount: f64,
    pub customer_id: String,
}

/// Payment provider contract
///
/// `initiate` returns the redirect URL the customer must visit, or
/// `None` for providers that settle without a browser hop. Failures
/// surface as `UpstreamFailure`; the order itself is already persisted
/// by the time this runs and stays untouched.
#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    async fn initiate(&self, request: &PaymentRequest) -> AppResult<Option<String>>;
}

/// Gateway talking to a real provider endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    endpoint: String,
}

/// Provider response to a session initiation
#[derive(Debug, Deserialize)]
struct InitiateResponse {
    redirect_url: Option<String>,
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn initiate(&self, request: &PaymentRequest) -> AppResult<Option<String>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::upstream("payment gateway", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                target: "payment",
                status = status.as_u16(),
                order_id = %request.order_id,
                "Gateway rejected payment initiation: {}",
                body
            );
            return Err(AppError::upstream(
                "payment gateway",
                format!("payment initiation rejected with HTTP {}", status.as_u16()),
            ));
        }

        let parsed: InitiateResponse = response.json().await.map_err(|e| {
            AppError::upstream(
                "payment gateway",
                format!("malformed initiation response: {}", e),
            )
        })?;

        tracing::info!(
            target: "payment",
            order_id = %request.order_id,
            redirect = parsed.redirect_url.is_some(),
            "Payment session initiated"
        );
        Ok(parsed.redirect_url)
    }
}

/// Local stand-in provider
///
/// Issues a `PAY-<uuid>` session reference and records every request
/// for inspection. `fail_next` makes exactly one upcoming call fail,
/// which is how tests exercise the checkout degradation path.
#[derive(Debug, Default)]
pub struct MockGateway {
    recorded: Mutex<Vec<PaymentRequest>>,
    fail_next: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `initiate` call fail with an upstream error
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.recorded.lock().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn initiate(&self, request: &PaymentRequest) -> AppResult<Option<String>> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::upstream(
                "payment gateway",
                "payment gateway unavailable",
            ));
        }

        let reference = format!("PAY-{}", Uuid::new_v4());
        tracing::debug!(
            target: "payment",
            order_id = %request.order_id,
            amount = request.amount,
            reference = %reference,
            "Mock payment session issued"
        );
        self.recorded.lock().push(request.clone());
        Ok(Some(format!(
            "https://pay.sandbox.invalid/session/{}",
            reference
        )))
    }
}

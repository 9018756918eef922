//! Checkout Orchestration
//!
//! Turns a cart into a persisted order. The sequence is fixed:
//!
//! 1. validate the cart and shipping details
//! 2. price the order server-side (never trusting client totals)
//! 3. price and validate the voucher, when one is supplied
//! 4. reserve the voucher use, then persist the order
//! 5. initiate the payment session (online orders only)
//!
//! The voucher reservation happens before the insert so a burst of
//! checkouts can never oversell a code; if the insert itself fails the
//! reservation is released again. A payment gateway failure is NOT
//! rolled back: the order stays persisted in NEW and the error carries
//! its ID, so payment can be retried against the same order.

use std::sync::Arc;

use shared::models::{Order, OrderStatus, PaymentMethod, PaymentStatus, Voucher};
use shared::util::now_millis;
use shared::{AppError, AppResult};
use uuid::Uuid;

use crate::money::{self, to_f64};
use crate::payment::{PaymentGateway, PaymentRequest};
use crate::stores::{OrderStore, VoucherStore};
use crate::vouchers::{DiscountOutcome, VoucherEngine, order_total};

pub use shared::models::{CheckoutRequest, CheckoutResponse};

/// Orchestrates pricing, voucher redemption, persistence and payment
#[derive(Clone)]
pub struct CheckoutService {
    orders: Arc<dyn OrderStore>,
    vouchers: Arc<dyn VoucherStore>,
    engine: VoucherEngine,
    gateway: Arc<dyn PaymentGateway>,
    /// Flat shipping fee quoted on every order, in currency units
    shipping_fee: f64,
}

impl CheckoutService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        vouchers: Arc<dyn VoucherStore>,
        gateway: Arc<dyn PaymentGateway>,
        shipping_fee: f64,
    ) -> Self {
        let engine = VoucherEngine::new(vouchers.clone());
        Self {
            orders,
            vouchers,
            engine,
            gateway,
            shipping_fee,
        }
    }

    /// Run a checkout end to end
    pub async fn checkout(&self, request: CheckoutRequest) -> AppResult<CheckoutResponse> {
        validate_request(&request)?;

        let subtotal = money::subtotal(&request.lines);
        let subtotal_f64 = to_f64(subtotal);

        // Voucher pricing is binding here: an inapplicable voucher
        // fails the checkout instead of being silently dropped.
        let priced: Option<(Voucher, DiscountOutcome)> = match &request.voucher_code {
            Some(code) => Some(
                self.engine
                    .price_for_checkout(code, subtotal_f64, self.shipping_fee)
                    .await?,
            ),
            None => None,
        };

        let outcome = priced.as_ref().map(|(_, o)| o);
        let total = order_total(subtotal, outcome, money::to_decimal(self.shipping_fee));

        // Consume the voucher use before the order exists; this is the
        // step concurrent checkouts race on.
        if let Some((voucher, _)) = &priced {
            self.vouchers.reserve_use(&voucher.code).await?;
        }

        let now = now_millis();
        let order = Order {
            id: format!("ord-{}", Uuid::new_v4()),
            customer_id: request.customer_id,
            vendor_id: request.vendor_id,
            status: OrderStatus::New,
            payment_status: PaymentStatus::Pending,
            payment_method: request.payment_method,
            subtotal: subtotal_f64,
            discount_amount: outcome.map(|o| to_f64(o.discount)).unwrap_or(0.0),
            shipping_fee: match outcome {
                Some(o) if o.free_shipping => 0.0,
                _ => self.shipping_fee,
            },
            total_amount: to_f64(total),
            voucher_code: priced.as_ref().map(|(v, _)| v.code.clone()),
            shipping_info: request.shipping_info,
            lines: request.lines,
            created_at: now,
            updated_at: now,
        };

        let order = match self.orders.insert(order).await {
            Ok(order) => order,
            Err(err) => {
                // The reserved use belongs to no order; hand it back.
                if let Some((voucher, _)) = &priced {
                    self.vouchers.release_use(&voucher.code).await?;
                }
                return Err(err);
            }
        };

        tracing::info!(
            target: "checkout",
            order_id = %order.id,
            customer_id = %order.customer_id,
            total = order.total_amount,
            voucher = order.voucher_code.as_deref().unwrap_or("-"),
            method = ?order.payment_method,
            "Order created"
        );

        let redirect_url = match order.payment_method {
            PaymentMethod::Online => self
                .gateway
                .initiate(&PaymentRequest {
                    order_id: order.id.clone(),
                    amount: order.total_amount,
                    customer_id: order.customer_id.clone(),
                })
                .await
                .map_err(|err| err.with_detail("order_id", order.id.clone()))?,
            PaymentMethod::CashOnDelivery => None,
        };

        Ok(CheckoutResponse {
            order,
            redirect_url,
        })
    }
}

/// Reject a cart that cannot become an order
fn validate_request(request: &CheckoutRequest) -> AppResult<()> {
    if request.customer_id.trim().is_empty() {
        return Err(AppError::validation("customer_id is required"));
    }
    if request.vendor_id.trim().is_empty() {
        return Err(AppError::validation("vendor_id is required"));
    }
    if request.lines.is_empty() {
        return Err(AppError::validation("cart is empty"));
    }
    for line in &request.lines {
        money::validate_order_line(line)?;
    }
    require_shipping_field(&request.shipping_info.name, "name")?;
    require_shipping_field(&request.shipping_info.phone, "phone")?;
    require_shipping_field(&request.shipping_info.address, "address")?;
    require_shipping_field(&request.shipping_info.city, "city")?;
    require_shipping_field(&request.shipping_info.ward, "ward")?;
    Ok(())
}

fn require_shipping_field(value: &str, field: &'static str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(
            AppError::validation(format!("shipping {} is required", field))
                .with_detail("field", format!("shipping_info.{}", field)),
        );
    }
    Ok(())
}

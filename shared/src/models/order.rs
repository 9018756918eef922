//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// Transitions form a DAG with two terminal states (DELIVERED, CANCELLED);
/// which edges an actor may take is decided by the transition policy, not
/// by this type.
///
/// Legacy records and old clients spell cancellation as `CANCEL` or
/// `CANCELED`; both are accepted on the way in and normalized to
/// `CANCELLED`. Serialization always emits the canonical spelling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    New,
    Confirmed,
    Preparing,
    Shipping,
    Delivered,
    #[serde(alias = "CANCEL", alias = "CANCELED")]
    Cancelled,
    CancellationRequested,
}

impl OrderStatus {
    /// Terminal states accept no further transitions
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::New => write!(f, "NEW"),
            OrderStatus::Confirmed => write!(f, "CONFIRMED"),
            OrderStatus::Preparing => write!(f, "PREPARING"),
            OrderStatus::Shipping => write!(f, "SHIPPING"),
            OrderStatus::Delivered => write!(f, "DELIVERED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
            OrderStatus::CancellationRequested => write!(f, "CANCELLATION_REQUESTED"),
        }
    }
}

/// Error for unrecognized status strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    /// Parse a raw status string, folding legacy aliases into the enum
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(OrderStatus::New),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "PREPARING" => Ok(OrderStatus::Preparing),
            "SHIPPING" => Ok(OrderStatus::Shipping),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" | "CANCELED" | "CANCEL" => Ok(OrderStatus::Cancelled),
            "CANCELLATION_REQUESTED" => Ok(OrderStatus::CancellationRequested),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Payment settlement status, independent of the lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Payment method selected at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Settled on delivery, no gateway involved
    CashOnDelivery,
    /// Settled through the payment gateway redirect flow
    Online,
}

/// One purchased product line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Product reference (String ID)
    pub product_id: String,
    pub name: String,
    /// Unit price in currency unit, agreed at checkout
    pub unit_price: f64,
    pub quantity: u32,
}

impl OrderLine {
    /// Line total in currency unit
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// Delivery address and contact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub ward: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Order entity
///
/// Owned by the order store. The status field is mutated only through the
/// transition service; everything else is fixed at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    /// Fulfilling vendor/store reference
    pub vendor_id: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    /// Sum of line totals in currency unit, computed server-side
    pub subtotal: f64,
    /// Discount applied against the subtotal (or shipping, for freeship)
    pub discount_amount: f64,
    /// Shipping fee charged on this order (0 when rebated by freeship)
    pub shipping_fee: f64,
    /// Authoritative amount due, fixed at checkout
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher_code: Option<String>,
    pub shipping_info: ShippingInfo,
    pub lines: Vec<OrderLine>,
    /// Creation time (Unix millis)
    pub created_at: i64,
    /// Last mutation time (Unix millis)
    pub updated_at: i64,
}

/// Listing filter; criteria are conjunctive, absent fields match all
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// True when `order` satisfies every present criterion
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(customer_id) = &self.customer_id
            && &order.customer_id != customer_id
        {
            return false;
        }
        if let Some(vendor_id) = &self.vendor_id
            && &order.vendor_id != vendor_id
        {
            return false;
        }
        if let Some(status) = self.status
            && order.status != status
        {
            return false;
        }
        true
    }
}

/// One page of an order listing, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub items: Vec<Order>,
    /// Matching orders before pagination was applied
    pub total: usize,
}

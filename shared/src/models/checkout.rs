//! Checkout wire types

use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderLine, PaymentMethod, ShippingInfo};

/// Checkout submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub vendor_id: String,
    pub lines: Vec<OrderLine>,
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher_code: Option<String>,
}

/// Checkout outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order: Order,
    /// Where to send the customer to pay (online orders only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;

    #[test]
    fn test_request_omits_absent_voucher() {
        let request = CheckoutRequest {
            customer_id: "cus-1".to_string(),
            vendor_id: "ven-1".to_string(),
            lines: vec![],
            shipping_info: ShippingInfo {
                name: "A".to_string(),
                phone: "1".to_string(),
                address: "X".to_string(),
                city: "Y".to_string(),
                ward: "Z".to_string(),
                notes: None,
            },
            payment_method: PaymentMethod::CashOnDelivery,
            voucher_code: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("voucher_code"));
        assert!(json.contains("\"CASH_ON_DELIVERY\""));
    }
}

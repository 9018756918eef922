//! Voucher Model

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discount type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// Percentage of the subtotal, optionally capped by max_discount
    Percentage,
    /// Flat amount off the subtotal
    Fixed,
    /// Rebates the shipping fee instead of the subtotal
    Freeship,
}

/// Voucher entity (discount code with eligibility rules and usage ledger)
///
/// Never deleted while in use; administrators soft-disable via `is_active`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Voucher {
    pub id: i64,
    /// Unique redemption code
    pub code: String,
    pub discount_type: DiscountType,
    /// Percentage (30 = 30%) or flat amount, depending on discount_type
    pub discount_value: f64,
    /// Cap on the computed discount (percentage type only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<f64>,
    /// Minimum order subtotal for eligibility
    pub min_order_value: f64,
    /// Validity window start (Unix millis)
    pub start_date: i64,
    /// Validity window end (Unix millis)
    pub end_date: i64,
    /// Total redemptions allowed across all users
    pub usage_limit: u32,
    /// Redemptions consumed so far; never exceeds usage_limit
    pub used_count: u32,
    /// Redemptions allowed per user (enforced by an identity ledger upstream)
    pub per_user_limit: u32,
    /// Whether this voucher stacks with other promotions
    pub combinable: bool,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create voucher payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherCreate {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub max_discount: Option<f64>,
    pub min_order_value: f64,
    pub start_date: i64,
    pub end_date: i64,
    pub usage_limit: u32,
    pub per_user_limit: Option<u32>,
    pub combinable: Option<bool>,
}

/// Quote response for a voucher against a hypothetical order value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherQuote {
    pub code: String,
    pub applicable: bool,
    /// Why the voucher cannot be applied (when `applicable` is false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub discount_amount: f64,
    pub free_shipping: bool,
    /// Total the order would settle at with this voucher applied
    pub projected_total: f64,
}

/// Why a voucher cannot be applied to an order
///
/// Ordered by check priority: the rule engine reports the first failing
/// check only. Display strings are stable wire vocabulary shown to users.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InapplicableReason {
    NotActive,
    NotStarted,
    Expired,
    BelowMinimum,
    UsageLimitReached,
}

impl InapplicableReason {
    /// The error code carried on the wire for this reason
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            InapplicableReason::NotActive => ErrorCode::VoucherNotActive,
            InapplicableReason::NotStarted => ErrorCode::VoucherNotStarted,
            InapplicableReason::Expired => ErrorCode::VoucherExpired,
            InapplicableReason::BelowMinimum => ErrorCode::VoucherBelowMinimum,
            InapplicableReason::UsageLimitReached => ErrorCode::VoucherUsageLimitReached,
        }
    }
}

impl fmt::Display for InapplicableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InapplicableReason::NotActive => write!(f, "voucher not active"),
            InapplicableReason::NotStarted => write!(f, "voucher not started"),
            InapplicableReason::Expired => write!(f, "voucher expired"),
            InapplicableReason::BelowMinimum => write!(f, "order below minimum"),
            InapplicableReason::UsageLimitReached => write!(f, "usage limit reached"),
        }
    }
}

impl From<InapplicableReason> for AppError {
    fn from(reason: InapplicableReason) -> Self {
        AppError::with_message(reason.error_code(), reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_voucher() -> Voucher {
        Voucher {
            id: 7_340_032_001,
            code: "SUMMER10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            max_discount: Some(40_000.0),
            min_order_value: 100_000.0,
            start_date: 1_717_200_000_000,
            end_date: 1_725_148_800_000,
            usage_limit: 500,
            used_count: 123,
            per_user_limit: 1,
            combinable: false,
            is_active: true,
            created_at: 1_717_100_000_000,
        }
    }

    #[test]
    fn test_voucher_roundtrip() {
        let voucher = sample_voucher();
        let json = serde_json::to_string(&voucher).unwrap();
        let parsed: Voucher = serde_json::from_str(&json).unwrap();
        assert_eq!(voucher, parsed);
    }

    #[test]
    fn test_discount_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&DiscountType::Percentage).unwrap(),
            "\"PERCENTAGE\""
        );
        assert_eq!(
            serde_json::to_string(&DiscountType::Freeship).unwrap(),
            "\"FREESHIP\""
        );
    }

    #[test]
    fn test_reason_display_strings() {
        assert_eq!(
            InapplicableReason::NotActive.to_string(),
            "voucher not active"
        );
        assert_eq!(
            InapplicableReason::NotStarted.to_string(),
            "voucher not started"
        );
        assert_eq!(InapplicableReason::Expired.to_string(), "voucher expired");
        assert_eq!(
            InapplicableReason::BelowMinimum.to_string(),
            "order below minimum"
        );
        assert_eq!(
            InapplicableReason::UsageLimitReached.to_string(),
            "usage limit reached"
        );
    }

    #[test]
    fn test_reason_to_app_error() {
        let err: AppError = InapplicableReason::Expired.into();
        assert_eq!(err.code, ErrorCode::VoucherExpired);
        assert_eq!(err.message, "voucher expired");

        let err: AppError = InapplicableReason::UsageLimitReached.into();
        assert_eq!(err.code, ErrorCode::VoucherUsageLimitReached);
        assert_eq!(err.message, "usage limit reached");
    }

    #[test]
    fn test_reason_error_codes_match_category() {
        use crate::error::ErrorCategory;

        for reason in [
            InapplicableReason::NotActive,
            InapplicableReason::NotStarted,
            InapplicableReason::Expired,
            InapplicableReason::BelowMinimum,
            InapplicableReason::UsageLimitReached,
        ] {
            assert_eq!(reason.error_code().category(), ErrorCategory::Voucher);
        }
    }
}

//! Voucher Rule Engine
//!
//! Validates a voucher against an order subtotal and prices the
//! discount. Validation runs a fixed sequence of checks and reports the
//! first failure only, so callers always see a single stable reason.

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{DiscountType, InapplicableReason, Voucher, VoucherQuote};
use shared::util::now_millis;
use shared::{AppError, AppResult};

use crate::money::{to_decimal, to_f64};
use crate::stores::VoucherStore;

/// What a voucher is worth against a concrete order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountOutcome {
    /// Discount amount; for freeship this equals the rebated fee
    pub discount: Decimal,
    /// True when the shipping fee is waived instead of the subtotal cut
    pub free_shipping: bool,
}

/// Check a voucher's eligibility rules, in fixed order
///
/// First failing check wins: 1. active flag, 2. window start,
/// 3. window end, 4. minimum order value, 5. usage limit.
pub fn validate(voucher: &Voucher, order_subtotal: f64, now: i64) -> Result<(), InapplicableReason> {
    if !voucher.is_active {
        return Err(InapplicableReason::NotActive);
    }
    if now < voucher.start_date {
        return Err(InapplicableReason::NotStarted);
    }
    if now > voucher.end_date {
        return Err(InapplicableReason::Expired);
    }
    if order_subtotal < voucher.min_order_value {
        return Err(InapplicableReason::BelowMinimum);
    }
    if voucher.used_count >= voucher.usage_limit {
        return Err(InapplicableReason::UsageLimitReached);
    }
    Ok(())
}

/// Price an applicable voucher
///
/// - `percentage`: subtotal * value / 100, capped by `max_discount`
///   when set, then clamped to the subtotal.
/// - `fixed`: the flat value, clamped to the subtotal.
/// - `freeship`: the shipping fee itself, applied against the shipping
///   line rather than the subtotal.
pub fn compute_discount(
    voucher: &Voucher,
    order_subtotal: Decimal,
    shipping_fee: Decimal,
) -> DiscountOutcome {
    match voucher.discount_type {
        DiscountType::Percentage => {
            let raw = order_subtotal * to_decimal(voucher.discount_value) / Decimal::ONE_HUNDRED;
            let capped = match voucher.max_discount {
                Some(cap) => raw.min(to_decimal(cap)),
                None => raw,
            };
            DiscountOutcome {
                discount: clamp_to_subtotal(capped, order_subtotal),
                free_shipping: false,
            }
        }
        DiscountType::Fixed => DiscountOutcome {
            discount: clamp_to_subtotal(to_decimal(voucher.discount_value), order_subtotal),
            free_shipping: false,
        },
        DiscountType::Freeship => DiscountOutcome {
            discount: shipping_fee,
            free_shipping: true,
        },
    }
}

/// A discount must never exceed the amount it discounts, nor go negative
fn clamp_to_subtotal(discount: Decimal, order_subtotal: Decimal) -> Decimal {
    discount.max(Decimal::ZERO).min(order_subtotal)
}

/// Authoritative order total
///
/// `max(0, subtotal - discount) + fee`, where the subtotal-side
/// discount and the added fee are both zero for freeship (the fee is
/// waived, not both waived and added back).
pub fn order_total(
    order_subtotal: Decimal,
    outcome: Option<&DiscountOutcome>,
    shipping_fee: Decimal,
) -> Decimal {
    let (subtotal_discount, fee) = match outcome {
        Some(o) if o.free_shipping => (Decimal::ZERO, Decimal::ZERO),
        Some(o) => (o.discount, shipping_fee),
        None => (Decimal::ZERO, shipping_fee),
    };
    (order_subtotal - subtotal_discount).max(Decimal::ZERO) + fee
}

/// Store-backed voucher engine
///
/// Reads current voucher state on every call; never trusts a
/// client-cached snapshot.
#[derive(Clone)]
pub struct VoucherEngine {
    vouchers: Arc<dyn VoucherStore>,
}

impl VoucherEngine {
    pub fn new(vouchers: Arc<dyn VoucherStore>) -> Self {
        Self { vouchers }
    }

    /// Non-binding quote: inapplicability is an answer, not an error
    ///
    /// Only an unknown code is an error; every validation failure comes
    /// back as `applicable: false` with the reason string for display.
    pub async fn quote(
        &self,
        code: &str,
        order_subtotal: f64,
        shipping_fee: f64,
    ) -> AppResult<VoucherQuote> {
        let voucher = self
            .vouchers
            .get_by_code(code)
            .await?
            .ok_or_else(|| AppError::voucher_not_found(code))?;

        let subtotal = to_decimal(order_subtotal);
        let fee = to_decimal(shipping_fee);

        match validate(&voucher, order_subtotal, now_millis()) {
            Ok(()) => {
                let outcome = compute_discount(&voucher, subtotal, fee);
                Ok(VoucherQuote {
                    code: voucher.code,
                    applicable: true,
                    reason: None,
                    discount_amount: to_f64(outcome.discount),
                    free_shipping: outcome.free_shipping,
                    projected_total: to_f64(order_total(subtotal, Some(&outcome), fee)),
                })
            }
            Err(reason) => Ok(VoucherQuote {
                code: voucher.code,
                applicable: false,
                reason: Some(reason.to_string()),
                discount_amount: 0.0,
                free_shipping: false,
                projected_total: to_f64(order_total(subtotal, None, fee)),
            }),
        }
    }

    /// Binding pricing for checkout: inapplicability is a hard error
    ///
    /// An order is never silently created without a discount the caller
    /// asked for; dropping the voucher is the caller's decision.
    pub async fn price_for_checkout(
        &self,
        code: &str,
        order_subtotal: f64,
        shipping_fee: f64,
    ) -> AppResult<(Voucher, DiscountOutcome)> {
        let voucher = self
            .vouchers
            .get_by_code(code)
            .await?
            .ok_or_else(|| AppError::voucher_not_found(code))?;

        validate(&voucher, order_subtotal, now_millis()).map_err(AppError::from)?;

        let outcome = compute_discount(
            &voucher,
            to_decimal(order_subtotal),
            to_decimal(shipping_fee),
        );
        Ok((voucher, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryVoucherStore;
    use shared::ErrorCode;

    fn voucher(discount_type: DiscountType, value: f64) -> Voucher {
        Voucher {
            id: 1,
            code: "TEST".to_string(),
            discount_type,
            discount_value: value,
            max_discount: None,
            min_order_value: 0.0,
            start_date: 0,
            end_date: i64::MAX,
            usage_limit: 100,
            used_count: 0,
            per_user_limit: 1,
            combinable: false,
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn test_validate_check_order_first_failure_wins() {
        // Everything is wrong at once; the active flag is reported
        let mut v = voucher(DiscountType::Fixed, 10_000.0);
        v.is_active = false;
        v.start_date = 2_000;
        v.end_date = 1_000;
        v.min_order_value = 1_000_000.0;
        v.used_count = v.usage_limit;

        assert_eq!(
            validate(&v, 0.0, 1_500),
            Err(InapplicableReason::NotActive)
        );

        v.is_active = true;
        assert_eq!(
            validate(&v, 0.0, 1_500),
            Err(InapplicableReason::NotStarted)
        );

        v.start_date = 1_000;
        assert_eq!(validate(&v, 0.0, 1_500), Err(InapplicableReason::Expired));

        v.end_date = 2_000;
        assert_eq!(
            validate(&v, 0.0, 1_500),
            Err(InapplicableReason::BelowMinimum)
        );

        v.min_order_value = 0.0;
        assert_eq!(
            validate(&v, 0.0, 1_500),
            Err(InapplicableReason::UsageLimitReached)
        );

        v.used_count = 0;
        assert_eq!(validate(&v, 0.0, 1_500), Ok(()));
    }

    #[test]
    fn test_validate_window_bounds_are_inclusive() {
        let mut v = voucher(DiscountType::Fixed, 10_000.0);
        v.start_date = 1_000;
        v.end_date = 2_000;

        assert_eq!(validate(&v, 0.0, 999), Err(InapplicableReason::NotStarted));
        assert_eq!(validate(&v, 0.0, 1_000), Ok(()));
        assert_eq!(validate(&v, 0.0, 2_000), Ok(()));
        assert_eq!(validate(&v, 0.0, 2_001), Err(InapplicableReason::Expired));
    }

    #[test]
    fn test_validate_exhausted_regardless_of_other_fields() {
        let mut v = voucher(DiscountType::Percentage, 10.0);
        v.usage_limit = 5;
        v.used_count = 5;
        assert_eq!(
            validate(&v, 10_000_000.0, 1_000),
            Err(InapplicableReason::UsageLimitReached)
        );
    }

    #[test]
    fn test_percentage_capped_by_max_discount() {
        // subtotal 500,000 at 10% -> raw 50,000, cap 40,000
        let mut v = voucher(DiscountType::Percentage, 10.0);
        v.max_discount = Some(40_000.0);

        let outcome = compute_discount(&v, Decimal::from(500_000), Decimal::from(30_000));
        assert_eq!(outcome.discount, Decimal::from(40_000));
        assert!(!outcome.free_shipping);

        let total = order_total(
            Decimal::from(500_000),
            Some(&outcome),
            Decimal::from(30_000),
        );
        assert_eq!(total, Decimal::from(490_000));
    }

    #[test]
    fn test_percentage_uncapped_when_below_max() {
        let mut v = voucher(DiscountType::Percentage, 10.0);
        v.max_discount = Some(40_000.0);

        let outcome = compute_discount(&v, Decimal::from(100_000), Decimal::from(30_000));
        assert_eq!(outcome.discount, Decimal::from(10_000));
    }

    #[test]
    fn test_fixed_discount_clamped_to_subtotal() {
        let v = voucher(DiscountType::Fixed, 80_000.0);

        let outcome = compute_discount(&v, Decimal::from(50_000), Decimal::from(30_000));
        assert_eq!(outcome.discount, Decimal::from(50_000));

        let total = order_total(
            Decimal::from(50_000),
            Some(&outcome),
            Decimal::from(30_000),
        );
        // Subtotal fully discounted, fee still owed
        assert_eq!(total, Decimal::from(30_000));
    }

    #[test]
    fn test_freeship_waives_fee_without_touching_subtotal() {
        // subtotal 200,000; fee 30,000 -> discount is the fee, total 200,000
        let v = voucher(DiscountType::Freeship, 0.0);

        let outcome = compute_discount(&v, Decimal::from(200_000), Decimal::from(30_000));
        assert_eq!(outcome.discount, Decimal::from(30_000));
        assert!(outcome.free_shipping);

        let total = order_total(
            Decimal::from(200_000),
            Some(&outcome),
            Decimal::from(30_000),
        );
        assert_eq!(total, Decimal::from(200_000));
    }

    #[test]
    fn test_total_without_voucher_adds_fee() {
        let total = order_total(Decimal::from(200_000), None, Decimal::from(30_000));
        assert_eq!(total, Decimal::from(230_000));
    }

    #[tokio::test]
    async fn test_quote_applicable() {
        let store = Arc::new(MemoryVoucherStore::new());
        let mut v = voucher(DiscountType::Percentage, 10.0);
        v.code = "PERCENT10".to_string();
        v.max_discount = Some(40_000.0);
        v.start_date = 0;
        v.end_date = i64::MAX;
        store.insert(v).await.unwrap();

        let engine = VoucherEngine::new(store);
        let quote = engine.quote("PERCENT10", 500_000.0, 30_000.0).await.unwrap();

        assert!(quote.applicable);
        assert_eq!(quote.discount_amount, 40_000.0);
        assert_eq!(quote.projected_total, 490_000.0);
        assert!(quote.reason.is_none());
    }

    #[tokio::test]
    async fn test_quote_inapplicable_is_an_answer() {
        let store = Arc::new(MemoryVoucherStore::new());
        let mut v = voucher(DiscountType::Fixed, 10_000.0);
        v.code = "MIN500".to_string();
        v.min_order_value = 500_000.0;
        store.insert(v).await.unwrap();

        let engine = VoucherEngine::new(store);
        let quote = engine.quote("MIN500", 100_000.0, 30_000.0).await.unwrap();

        assert!(!quote.applicable);
        assert_eq!(quote.reason.as_deref(), Some("order below minimum"));
        assert_eq!(quote.discount_amount, 0.0);
        assert_eq!(quote.projected_total, 130_000.0);
    }

    #[tokio::test]
    async fn test_quote_unknown_code_is_an_error() {
        let engine = VoucherEngine::new(Arc::new(MemoryVoucherStore::new()));
        let err = engine.quote("GHOST", 100_000.0, 30_000.0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VoucherNotFound);
    }

    #[tokio::test]
    async fn test_price_for_checkout_inapplicable_is_hard_error() {
        let store = Arc::new(MemoryVoucherStore::new());
        let mut v = voucher(DiscountType::Fixed, 10_000.0);
        v.code = "OFF".to_string();
        v.is_active = false;
        store.insert(v).await.unwrap();

        let engine = VoucherEngine::new(store);
        let err = engine
            .price_for_checkout("OFF", 100_000.0, 30_000.0)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VoucherNotActive);
        assert_eq!(err.message, "voucher not active");
    }
}

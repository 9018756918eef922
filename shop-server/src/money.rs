//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic goes through `Decimal` internally and is
//! converted back to `f64` for storage and serialization. Inputs are
//! validated at the API boundary so non-finite values never reach the
//! calculation paths.

use rust_decimal::prelude::*;
use shared::models::OrderLine;
use shared::{AppError, AppResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per line
const MAX_PRICE: f64 = 1_000_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: u32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate one order line before pricing
pub fn validate_order_line(line: &OrderLine) -> AppResult<()> {
    if line.product_id.trim().is_empty() {
        return Err(AppError::validation("product_id must not be empty"));
    }

    require_finite(line.unit_price, "unit_price")?;
    if line.unit_price < 0.0 {
        return Err(AppError::validation(format!(
            "unit_price must be non-negative, got {}",
            line.unit_price
        )));
    }
    if line.unit_price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, line.unit_price
        )));
    }

    if line.quantity == 0 {
        return Err(AppError::validation("quantity must be positive"));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, line.quantity
        )));
    }

    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Input values should be pre-validated via `require_finite()` at the
/// boundary. If NaN/Infinity somehow reaches here, logs an error and
/// returns ZERO to avoid silent corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp with inputs bounded by MAX_PRICE *
        // MAX_QUANTITY (validated at boundary) is always representable as f64
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Recompute the order subtotal from its lines
///
/// Never trusts a client-supplied total: the subtotal is always the sum
/// of `unit_price * quantity` over the submitted lines.
pub fn subtotal(lines: &[OrderLine]) -> Decimal {
    lines
        .iter()
        .map(|line| to_decimal(line.unit_price) * Decimal::from(line.quantity))
        .sum::<Decimal>()
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(unit_price: f64, quantity: u32) -> OrderLine {
        OrderLine {
            product_id: "prod-1".to_string(),
            name: "Test product".to_string(),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let lines = vec![line(250_000.0, 2), line(45_000.0, 3)];
        assert_eq!(subtotal(&lines), Decimal::new(635_000, 0));
    }

    #[test]
    fn test_subtotal_empty_is_zero() {
        assert_eq!(subtotal(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_subtotal_avoids_float_drift() {
        // 0.1 + 0.2 style drift must not leak into totals
        let lines = vec![line(0.1, 1), line(0.2, 1)];
        assert_eq!(subtotal(&lines), Decimal::new(3, 1));
    }

    #[test]
    fn test_validate_rejects_non_finite_price() {
        assert!(validate_order_line(&line(f64::NAN, 1)).is_err());
        assert!(validate_order_line(&line(f64::INFINITY, 1)).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let err = validate_order_line(&line(-1.0, 1)).unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        assert!(validate_order_line(&line(100.0, 0)).is_err());
    }

    #[test]
    fn test_validate_rejects_excessive_values() {
        assert!(validate_order_line(&line(MAX_PRICE * 2.0, 1)).is_err());
        assert!(validate_order_line(&line(100.0, MAX_QUANTITY + 1)).is_err());
    }

    #[test]
    fn test_validate_accepts_reasonable_line() {
        assert!(validate_order_line(&line(250_000.0, 2)).is_ok());
    }

    #[test]
    fn test_to_f64_rounds_half_up() {
        assert_eq!(to_f64(Decimal::new(12345, 3)), 12.35);
        assert_eq!(to_f64(Decimal::new(12344, 3)), 12.34);
    }
}

//! Voucher Discounts
//!
//! Eligibility rules and discount pricing for redemption codes. The
//! pure rule functions ([`validate`], [`compute_discount`],
//! [`order_total`]) are separated from the store-backed
//! [`VoucherEngine`] so the math is testable without any storage.

mod engine;

pub use engine::{DiscountOutcome, VoucherEngine, compute_discount, order_total, validate};
pub use shared::models::VoucherQuote;

//! Voucher API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::vouchers::VoucherQuote;
use shared::models::{DiscountType, Voucher, VoucherCreate};
use shared::util::{now_millis, snowflake_id};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

/// Create a voucher
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<VoucherCreate>,
) -> AppResult<ApiResponse<Voucher>> {
    validate_create(&payload)?;

    let now = now_millis();
    let voucher = Voucher {
        id: snowflake_id(),
        code: payload.code,
        discount_type: payload.discount_type,
        discount_value: payload.discount_value,
        max_discount: payload.max_discount,
        min_order_value: payload.min_order_value,
        start_date: payload.start_date,
        end_date: payload.end_date,
        usage_limit: payload.usage_limit,
        used_count: 0,
        per_user_limit: payload.per_user_limit.unwrap_or(1),
        combinable: payload.combinable.unwrap_or(false),
        is_active: true,
        created_at: now,
    };

    let voucher = state.vouchers.insert(voucher).await?;
    tracing::info!(target: "vouchers", code = %voucher.code, "Voucher created");
    Ok(ApiResponse::success(voucher))
}

/// List all vouchers
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Voucher>>> {
    let vouchers = state.vouchers.list().await?;
    Ok(ApiResponse::success(vouchers))
}

/// Get voucher by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Voucher>> {
    let voucher = state
        .vouchers
        .get(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::VoucherNotFound).with_detail("id", id))?;
    Ok(ApiResponse::success(voucher))
}

/// Quote request: a voucher code against a hypothetical order value
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub code: String,
    pub order_value: f64,
}

/// Preview what a voucher is worth before checkout
///
/// Inapplicability is part of the answer, not an error; only an unknown
/// code fails the request.
pub async fn quote(
    State(state): State<ServerState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<ApiResponse<VoucherQuote>> {
    let quote = state
        .voucher_engine
        .quote(&payload.code, payload.order_value, state.config.shipping_fee)
        .await?;
    Ok(ApiResponse::success(quote))
}

fn validate_create(payload: &VoucherCreate) -> AppResult<()> {
    if payload.code.trim().is_empty() {
        return Err(AppError::validation("voucher code is required"));
    }
    match payload.discount_type {
        DiscountType::Percentage => {
            if payload.discount_value <= 0.0 || payload.discount_value > 100.0 {
                return Err(AppError::validation(
                    "percentage discount must be between 0 and 100",
                ));
            }
        }
        DiscountType::Fixed => {
            if payload.discount_value <= 0.0 {
                return Err(AppError::validation("discount_value must be positive"));
            }
        }
        // The rebated amount is the shipping fee; the value is unused
        DiscountType::Freeship => {}
    }
    if let Some(cap) = payload.max_discount
        && cap <= 0.0
    {
        return Err(AppError::validation("max_discount must be positive"));
    }
    if payload.min_order_value < 0.0 {
        return Err(AppError::validation("min_order_value must not be negative"));
    }
    if payload.end_date <= payload.start_date {
        return Err(AppError::validation("end_date must be after start_date"));
    }
    if payload.usage_limit == 0 {
        return Err(AppError::validation("usage_limit must be positive"));
    }
    Ok(())
}

//! Checkout API Handlers

use axum::{Json, extract::State};

use crate::checkout::{CheckoutRequest, CheckoutResponse};
use crate::core::ServerState;
use shared::{ApiResponse, AppResult};

/// Submit a cart for checkout
///
/// Returns the persisted order; online orders additionally carry the
/// payment redirect URL. A failed payment initiation still leaves the
/// order behind, and the error names it in `details.order_id`.
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let response = state.checkout.checkout(payload).await?;
    Ok(ApiResponse::success(response))
}

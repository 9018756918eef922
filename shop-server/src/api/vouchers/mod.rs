//! Voucher API Module
//!
//! Administration (create, list, fetch) plus the public quote endpoint
//! used by carts to preview a discount before checkout.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Voucher router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/vouchers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/quote", post(handler::quote))
        .route("/{id}", get(handler::get_by_id))
}

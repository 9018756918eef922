//! Checkout API Module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Checkout router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/checkout", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", post(handler::checkout))
}

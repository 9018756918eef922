//! HTTP API
//!
//! Resource routers merged into the application by
//! [`crate::services::http::build_app`]. Each resource nests its own
//! `/api/<resource>` prefix; `health` stays at the root for probes.

pub mod checkout;
pub mod health;
pub mod orders;
pub mod vouchers;

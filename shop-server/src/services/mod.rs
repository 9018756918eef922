//! Service layer
//!
//! - [`http`] - router assembly and the HTTP access log

pub mod http;

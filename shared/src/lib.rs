//! Shared types for the order platform
//!
//! Common types used across server and client crates: data models, the
//! status event and channel vocabulary, the unified error system, and
//! small utilities.

pub mod error;
pub mod event;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use event::{Channel, StatusUpdateEvent};

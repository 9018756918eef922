//! Order lifecycle state machine
//!
//! [`policy`] is the pure (status, role) transition table; [`service`]
//! wraps it with persistence and event emission.

pub mod policy;
pub mod service;

pub use policy::{allowed_transitions, can_transition};
pub use service::LifecycleService;

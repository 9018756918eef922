//! Actor Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role an actor holds when operating on orders
///
/// The transition policy is keyed by this role; authentication and
/// role assignment are handled upstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Customer,
    Staff,
    Vendor,
    Admin,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRole::Customer => write!(f, "CUSTOMER"),
            ActorRole::Staff => write!(f, "STAFF"),
            ActorRole::Vendor => write!(f, "VENDOR"),
            ActorRole::Admin => write!(f, "ADMIN"),
        }
    }
}

/// An authenticated actor performing an order operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub role: ActorRole,
    pub id: String,
    /// Display name (snapshot for audit)
    pub name: String,
}

impl Actor {
    pub fn new(role: ActorRole, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role,
            id: id.into(),
            name: name.into(),
        }
    }
}

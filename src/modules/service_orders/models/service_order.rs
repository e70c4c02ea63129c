// Service order model
//
// A service order is a per-user collection of requested services: the
// current shopping cart, a wish list, or an order that has been placed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::AppError;

/// Class name used in user-facing error messages
pub const RESOURCE_CLASS: &str = "ServiceOrder";

/// Service order lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceOrderState {
    /// The user's current shopping cart (at most one per user)
    #[default]
    Cart,

    /// Saved for later
    Wish,

    /// Placed through the ordering workflow; never a creation state
    Ordered,
}

impl ServiceOrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceOrderState::Cart => "cart",
            ServiceOrderState::Wish => "wish",
            ServiceOrderState::Ordered => "ordered",
        }
    }
}

impl std::fmt::Display for ServiceOrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceOrderState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cart" => Ok(ServiceOrderState::Cart),
            "wish" => Ok(ServiceOrderState::Wish),
            "ordered" => Ok(ServiceOrderState::Ordered),
            _ => Err(format!("Invalid service order state: {}", s)),
        }
    }
}

/// A stored service order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceOrder {
    pub id: i64,
    pub name: String,
    pub state: ServiceOrderState,
    /// Owning user
    pub user_id: i64,
    /// When the order moved to `ordered`
    pub placed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceOrder {
    pub fn is_cart(&self) -> bool {
        self.state == ServiceOrderState::Cart
    }

    pub fn is_ordered(&self) -> bool {
        self.state == ServiceOrderState::Ordered
    }
}

/// Not-found error naming the resource class and the requested id or alias
pub fn not_found(id: impl std::fmt::Display) -> AppError {
    AppError::not_found(format!("Couldn't find {} with 'id'={}", RESOURCE_CLASS, id))
}

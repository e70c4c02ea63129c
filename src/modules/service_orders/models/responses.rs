use serde::{Deserialize, Serialize};

use super::service_order::{ServiceOrder, ServiceOrderState};
use crate::core::AppError;

/// Name of the collection in envelopes and hrefs
pub const COLLECTION_NAME: &str = "service_orders";

/// Builds absolute hrefs for collection members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrefBuilder {
    collection_url: String,
}

impl HrefBuilder {
    /// `base_url` is scheme and authority, e.g. `http://localhost:8080`
    pub fn new(base_url: &str) -> Self {
        Self {
            collection_url: format!(
                "{}/api/{}",
                base_url.trim_end_matches('/'),
                COLLECTION_NAME
            ),
        }
    }

    pub fn resource(&self, id: i64) -> String {
        format!("{}/{}", self.collection_url, id)
    }
}

/// Service order as rendered by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOrderResponse {
    pub id: i64,
    pub href: String,
    pub name: String,
    pub state: ServiceOrderState,
    pub user_id: i64,
    pub placed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ServiceOrderResponse {
    pub fn from_order(order: ServiceOrder, hrefs: &HrefBuilder) -> Self {
        Self {
            href: hrefs.resource(order.id),
            id: order.id,
            name: order.name,
            state: order.state,
            user_id: order.user_id,
            placed_at: order.placed_at.map(|t| t.to_rfc3339()),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

/// Outcome of an action that does not return a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl ActionResult {
    pub fn success(message: impl Into<String>, href: Option<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            href,
        }
    }

    pub fn failure(err: &AppError, href: Option<String>) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            href,
        }
    }

    pub fn deleted(id: i64, hrefs: &HrefBuilder) -> Self {
        Self::success(
            format!("{} id: {} deleting", COLLECTION_NAME, id),
            Some(hrefs.resource(id)),
        )
    }
}

/// One entry of a `results` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResultEntry {
    Order(ServiceOrderResponse),
    Action(ActionResult),
}

/// Envelope returned by create and bulk actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<ResultEntry>,
}

/// Member of a collection listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CollectionMember {
    Reference { href: String },
    Expanded(ServiceOrderResponse),
}

/// Envelope returned by `GET /service_orders`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionResponse {
    pub name: &'static str,
    /// Every service order in the store
    pub count: i64,
    /// Members returned to this caller
    pub subcount: i64,
    pub resources: Vec<CollectionMember>,
}

// Request payloads for the service order endpoints
//
// POST bodies multiplex several operations through an `action` field. They are
// parsed into closed tagged unions so each action reaches its own handler.

use serde::Deserialize;
use serde_json::Value;

use super::service_order::{not_found, ServiceOrderState};
use crate::core::{AppError, Result};

const CREATE_FAILED: &str = "Could not create the new service order";

/// Longest name the `service_orders.name` column holds
pub const MAX_NAME_LENGTH: usize = 255;

/// Alias resolving to the caller's current shopping cart
pub const CART_ALIAS: &str = "cart";

/// Fields accepted when creating a service order
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewServiceOrder {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: Option<ServiceOrderState>,
}

impl NewServiceOrder {
    pub fn new(name: impl Into<String>, state: Option<ServiceOrderState>) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }

    /// Validate the creation rules and resolve the default state
    pub fn validate(&self) -> Result<(String, ServiceOrderState)> {
        if let Some(reason) = name_problem(&self.name) {
            return Err(AppError::validation(format!("{} - {}", CREATE_FAILED, reason)));
        }

        let state = self.state.unwrap_or_default();
        if state == ServiceOrderState::Ordered {
            return Err(AppError::validation(format!(
                "{} - can't create an ordered service order",
                CREATE_FAILED
            )));
        }

        Ok((self.name.clone(), state))
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceOrderChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<ServiceOrderState>,
}

impl ServiceOrderChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.state.is_none()
    }
}

/// Reference to a member of the collection, by `id` or `href`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResourceReference {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub href: Option<String>,
}

impl ResourceReference {
    pub fn from_id(id: i64) -> Self {
        Self {
            id: Some(id),
            href: None,
        }
    }

    /// The referenced id; an href contributes its last path segment
    pub fn resolve_id(&self) -> Result<i64> {
        if let Some(id) = self.id {
            return Ok(id);
        }

        match &self.href {
            Some(href) => href
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .and_then(|segment| segment.parse().ok())
                .ok_or_else(|| AppError::validation(format!("Invalid resource href {}", href))),
            None => Err(AppError::validation("Resource id or href is required")),
        }
    }
}

/// One entry of a bulk edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceOrderEdit {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<ServiceOrderState>,
}

impl ServiceOrderEdit {
    pub fn reference(&self) -> ResourceReference {
        ResourceReference {
            id: self.id,
            href: self.href.clone(),
        }
    }

    pub fn changes(&self) -> ServiceOrderChanges {
        ServiceOrderChanges {
            name: self.name.clone(),
            state: self.state,
        }
    }
}

/// Actions accepted by `POST /service_orders`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum CollectionAction {
    Create {
        #[serde(default)]
        resource: Option<NewServiceOrder>,
        #[serde(default)]
        resources: Vec<NewServiceOrder>,
    },
    Edit {
        #[serde(default)]
        resources: Vec<ServiceOrderEdit>,
    },
    Delete {
        #[serde(default)]
        resources: Vec<ResourceReference>,
    },
}

impl CollectionAction {
    /// Parse a collection POST body. A body without `action` is a single create.
    pub fn from_body(body: Value) -> Result<Self> {
        let action = action_name(&body)?;
        match action.as_deref() {
            None => {
                let order: NewServiceOrder = parse(body)?;
                Ok(CollectionAction::Create {
                    resource: Some(order),
                    resources: Vec::new(),
                })
            }
            Some("create" | "edit" | "delete") => parse(body),
            Some(other) => Err(unsupported(other)),
        }
    }
}

/// Actions accepted by `POST /service_orders/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ResourceAction {
    Edit {
        #[serde(default)]
        resource: ServiceOrderChanges,
    },
    Delete,
}

impl ResourceAction {
    pub fn from_body(body: Value) -> Result<Self> {
        let action = action_name(&body)?;
        match action.as_deref() {
            None => Err(AppError::validation("Missing action")),
            Some("edit" | "delete") => parse(body),
            Some(other) => Err(unsupported(other)),
        }
    }
}

/// Identifies a single service order: a numeric id or the cart alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderLookup {
    Id(i64),
    Cart,
}

impl std::str::FromStr for OrderLookup {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if s == CART_ALIAS {
            return Ok(OrderLookup::Cart);
        }
        s.parse().map(OrderLookup::Id).map_err(|_| not_found(s))
    }
}

impl std::fmt::Display for OrderLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderLookup::Id(id) => write!(f, "{}", id),
            OrderLookup::Cart => f.write_str(CART_ALIAS),
        }
    }
}

/// Why a name can't be stored, if it can't
pub fn name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("name can't be blank")
    } else if name.chars().count() > MAX_NAME_LENGTH {
        Some("name is too long")
    } else {
        None
    }
}

fn action_name(body: &Value) -> Result<Option<String>> {
    if !body.is_object() {
        return Err(AppError::validation("Request body must be a JSON object"));
    }

    match body.get("action") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(action)) => Ok(Some(action.clone())),
        Some(_) => Err(AppError::validation("Action must be a string")),
    }
}

fn parse<T: serde::de::DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body)
        .map_err(|e| AppError::validation(format!("Invalid request body: {}", e)))
}

fn unsupported(action: &str) -> AppError {
    AppError::validation(format!("Unsupported action {}", action))
}

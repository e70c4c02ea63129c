use std::fmt;

/// Resource types guarded by the authorization gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    ServiceOrders,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::ServiceOrders => "service_orders",
        }
    }
}

/// Actions a caller may be permitted to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

/// Whether an action targets the whole collection or a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Collection,
    Resource,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Collection => "collection",
            Granularity::Resource => "resource",
        }
    }
}

/// A named permission, rendered as `resource:granularity:action`
/// (e.g. `service_orders:collection:read`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission {
    pub resource: ResourceType,
    pub action: Action,
    pub granularity: Granularity,
}

impl Permission {
    /// Identifier granting every permission
    pub const WILDCARD: &'static str = "*";

    pub fn new(resource: ResourceType, action: Action, granularity: Granularity) -> Self {
        Self {
            resource,
            action,
            granularity,
        }
    }

    pub fn identifier(&self) -> String {
        self.to_string()
    }

    /// Every permission defined for a resource type
    pub fn all_for(resource: ResourceType) -> Vec<Permission> {
        let mut permissions = Vec::new();
        for granularity in [Granularity::Collection, Granularity::Resource] {
            for action in [Action::Read, Action::Create, Action::Edit, Action::Delete] {
                permissions.push(Permission::new(resource, action, granularity));
            }
        }
        permissions
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.resource.as_str(),
            self.granularity.as_str(),
            self.action.as_str()
        )
    }
}

use crate::core::{AppError, Result};
use crate::modules::authorization::models::{
    Action, Granularity, Permission, Principal, ResourceType,
};

/// Authorization gate consulted before any store access
pub trait Authorizer: Send + Sync {
    /// Returns `AppError::Forbidden` when the principal lacks the permission
    fn authorize(
        &self,
        principal: &Principal,
        resource: ResourceType,
        action: Action,
        granularity: Granularity,
    ) -> Result<()>;
}

/// Checks the permission identifiers attached to the principal
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissionAuthorizer;

impl Authorizer for PermissionAuthorizer {
    fn authorize(
        &self,
        principal: &Principal,
        resource: ResourceType,
        action: Action,
        granularity: Granularity,
    ) -> Result<()> {
        let permission = Permission::new(resource, action, granularity);

        if principal.holds(&permission) {
            return Ok(());
        }

        tracing::warn!(
            user_id = principal.user_id,
            permission = %permission,
            "Authorization denied"
        );

        Err(AppError::forbidden(format!(
            "Use of the {} action on {} is forbidden",
            permission,
            resource.as_str()
        )))
    }
}

use std::collections::HashSet;
use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use super::permission::Permission;
use crate::core::AppError;

/// The authenticated caller, as resolved from its API key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub user_name: String,
    pub permissions: HashSet<String>,
}

impl Principal {
    pub fn new(user_id: i64, user_name: impl Into<String>) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            permissions: HashSet::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission.identifier());
        self
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions
            .extend(permissions.into_iter().map(|p| p.identifier()));
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.permissions.insert(identifier.into());
        self
    }

    pub fn holds(&self, permission: &Permission) -> bool {
        self.permissions.contains(Permission::WILDCARD)
            || self.permissions.contains(&permission.identifier())
    }
}

/// Extracts the principal stored by the API key middleware
impl FromRequest for Principal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Principal>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("Authentication required")),
        )
    }
}

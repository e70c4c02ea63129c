// Authorization module
//
// Resolves API credentials to principals and checks named permissions
// on resource types at collection or resource granularity.

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Action, Granularity, Permission, Principal, ResourceType};
pub use repositories::{IdentityRepository, InMemoryIdentityRepository, MySqlIdentityRepository};
pub use services::{Authorizer, PermissionAuthorizer};

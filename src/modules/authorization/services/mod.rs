pub mod authorizer;

pub use authorizer::{Authorizer, PermissionAuthorizer};

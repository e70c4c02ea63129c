mod permission;
mod principal;

pub use permission::{Action, Granularity, Permission, ResourceType};
pub use principal::Principal;

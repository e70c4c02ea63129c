pub mod identity_repository;

pub use identity_repository::{IdentityRepository, InMemoryIdentityRepository, MySqlIdentityRepository};

//! Service Orders API Library
//!
//! Owner-scoped shopping carts, wish lists and placed orders behind an
//! API-key authenticated REST interface.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::authorization;
pub use modules::service_orders;

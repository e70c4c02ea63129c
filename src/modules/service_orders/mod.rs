// Service orders module
//
// Owner-scoped shopping carts, wish lists and placed orders.

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{ServiceOrder, ServiceOrderState};
pub use repositories::{
    InMemoryServiceOrderRepository, MySqlServiceOrderRepository, ServiceOrderRepository,
};
pub use services::ServiceOrderService;

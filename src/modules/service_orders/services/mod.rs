pub mod service_order_service;

pub use service_order_service::{ServiceOrderPage, ServiceOrderService};

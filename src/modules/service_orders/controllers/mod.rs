pub mod service_order_controller;

pub use service_order_controller::configure;

pub mod in_memory;
pub mod service_order_repository;

pub use in_memory::InMemoryServiceOrderRepository;
pub use service_order_repository::{
    MySqlServiceOrderRepository, ServiceOrderRepository, CART_EXISTS,
};

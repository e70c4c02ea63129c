mod requests;
mod responses;
mod service_order;

pub use requests::{
    name_problem, CollectionAction, NewServiceOrder, OrderLookup, ResourceAction,
    ResourceReference, ServiceOrderChanges, ServiceOrderEdit, CART_ALIAS, MAX_NAME_LENGTH,
};
pub use responses::{
    ActionResult, CollectionMember, CollectionResponse, HrefBuilder, ResultEntry,
    ResultsResponse, ServiceOrderResponse, COLLECTION_NAME,
};
pub use service_order::{not_found, ServiceOrder, ServiceOrderState, RESOURCE_CLASS};

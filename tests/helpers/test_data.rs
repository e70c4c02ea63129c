// Test Data Factory
//
// Request bodies for the service order endpoints.

use serde_json::{json, Value};
use uuid::Uuid;

pub const COLLECTION_PATH: &str = "/api/service_orders";
pub const CART_PATH: &str = "/api/service_orders/cart";

/// Test data factory for service order payloads
pub struct TestDataFactory;

impl TestDataFactory {
    /// Unique order name with a TEST prefix
    pub fn random_name() -> String {
        format!("TEST-{}", Uuid::new_v4())
    }

    /// Bare create body without a state, which defaults to `cart`
    pub fn cart_payload() -> Value {
        json!({ "name": "shopping cart" })
    }

    /// Bare create body with an explicit state
    pub fn service_order_payload(name: &str, state: &str) -> Value {
        json!({ "name": name, "state": state })
    }

    /// `{action: "create", resources: [...]}` with one wish per name
    pub fn create_wishes_payload(names: &[&str]) -> Value {
        let resources: Vec<Value> = names
            .iter()
            .map(|name| json!({ "name": name, "state": "wish" }))
            .collect();
        json!({ "action": "create", "resources": resources })
    }

    /// `{action: "edit", resources: [...]}`
    pub fn edit_payload(resources: Vec<Value>) -> Value {
        json!({ "action": "edit", "resources": resources })
    }

    /// `{action: "delete", resources: [{id}, ...]}`
    pub fn delete_payload(ids: &[i64]) -> Value {
        let resources: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
        json!({ "action": "delete", "resources": resources })
    }

    /// Single-resource edit body
    pub fn edit_resource_payload(changes: Value) -> Value {
        json!({ "action": "edit", "resource": changes })
    }

    pub fn resource_path(id: i64) -> String {
        format!("{}/{}", COLLECTION_PATH, id)
    }
}

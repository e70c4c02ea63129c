// Test Application Helpers
//
// Builds the full application routing on top of the in-memory stores with a
// fixed set of API keys.

use std::sync::Arc;

use actix_web::{test::TestRequest, web};
use serde_json::Value;
use service_orders_api::middleware::API_KEY_HEADER;
use service_orders_api::modules::{
    self,
    authorization::{
        Action, Granularity, IdentityRepository, InMemoryIdentityRepository, Permission,
        PermissionAuthorizer, Principal, ResourceType,
    },
    service_orders::{InMemoryServiceOrderRepository, ServiceOrderService},
};

pub const ALICE_ID: i64 = 1;
pub const BOB_ID: i64 = 2;
pub const READER_ID: i64 = 3;

/// Every service order permission
pub const ALICE_KEY: &str = "so_alice_0000000000000000";
/// Every service order permission
pub const BOB_KEY: &str = "so_bob_00000000000000000";
/// Collection and resource read only
pub const READER_KEY: &str = "so_reader_000000000000000";

/// In-memory application state shared by one test
pub struct TestContext {
    pub repository: Arc<InMemoryServiceOrderRepository>,
    pub service: Arc<ServiceOrderService>,
    pub identities: Arc<dyn IdentityRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryServiceOrderRepository::new());
        let service = Arc::new(ServiceOrderService::new(
            repository.clone(),
            Arc::new(PermissionAuthorizer),
        ));

        let read_only = [Granularity::Collection, Granularity::Resource]
            .into_iter()
            .map(|g| Permission::new(ResourceType::ServiceOrders, Action::Read, g));

        let identities = InMemoryIdentityRepository::new()
            .with_key(ALICE_KEY, full_access(ALICE_ID, "alice"))
            .with_key(BOB_KEY, full_access(BOB_ID, "bob"))
            .with_key(
                READER_KEY,
                Principal::new(READER_ID, "reader").with_permissions(read_only),
            );

        Self {
            repository,
            service,
            identities: Arc::new(identities),
        }
    }

    /// Route configuration for `App::configure`
    pub fn routes(&self) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
        let service = self.service.clone();
        let identities = self.identities.clone();
        move |cfg: &mut web::ServiceConfig| {
            modules::configure(cfg, service.clone(), identities.clone())
        }
    }
}

fn full_access(user_id: i64, name: &str) -> Principal {
    Principal::new(user_id, name).with_permissions(Permission::all_for(ResourceType::ServiceOrders))
}

/// Authenticated GET
pub fn api_get(path: &str, api_key: &str) -> TestRequest {
    TestRequest::get()
        .uri(path)
        .insert_header((API_KEY_HEADER, api_key))
}

/// Authenticated POST with a JSON body
pub fn api_post(path: &str, api_key: &str, body: &Value) -> TestRequest {
    TestRequest::post()
        .uri(path)
        .insert_header((API_KEY_HEADER, api_key))
        .set_json(body)
}

/// Authenticated DELETE
pub fn api_delete(path: &str, api_key: &str) -> TestRequest {
    TestRequest::delete()
        .uri(path)
        .insert_header((API_KEY_HEADER, api_key))
}

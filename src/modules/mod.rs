pub mod authorization;
pub mod health;
pub mod service_orders;

use std::sync::Arc;

use actix_web::web;

use crate::middleware::{json_error_handler, query_error_handler, ApiKeyAuth};
use authorization::IdentityRepository;
use service_orders::ServiceOrderService;

/// Register every route of the application
///
/// Health probes are public. Everything under `/api` requires an API key.
pub fn configure(
    cfg: &mut web::ServiceConfig,
    service: Arc<ServiceOrderService>,
    identities: Arc<dyn IdentityRepository>,
) {
    cfg.app_data(web::Data::new(service))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .configure(health::configure)
        .service(
            web::scope("/api")
                .wrap(ApiKeyAuth::new(identities))
                .configure(service_orders::controllers::configure),
        );
}

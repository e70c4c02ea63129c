use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::Value;

use crate::core::error::AppError;
use crate::modules::authorization::Principal;
use crate::modules::service_orders::models::{
    ActionResult, CollectionAction, CollectionMember, CollectionResponse, HrefBuilder,
    ResourceAction, ResourceReference, ResultEntry, ResultsResponse, ServiceOrder,
    ServiceOrderResponse, COLLECTION_NAME,
};
use crate::modules::service_orders::services::ServiceOrderService;

/// Query parameters for listing service orders
#[derive(Debug, Deserialize)]
pub struct ListServiceOrdersQuery {
    /// `resources` renders full records instead of hrefs
    #[serde(default)]
    pub expand: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ListServiceOrdersQuery {
    fn expands_resources(&self) -> bool {
        self.expand
            .as_deref()
            .is_some_and(|e| e.split(',').any(|part| part.trim() == "resources"))
    }
}

fn hrefs(req: &HttpRequest) -> HrefBuilder {
    let info = req.connection_info();
    HrefBuilder::new(&format!("{}://{}", info.scheme(), info.host()))
}

fn render(order: ServiceOrder, hrefs: &HrefBuilder) -> ResultEntry {
    ResultEntry::Order(ServiceOrderResponse::from_order(order, hrefs))
}

fn reference_href(reference: &ResourceReference, hrefs: &HrefBuilder) -> Option<String> {
    reference.resolve_id().ok().map(|id| hrefs.resource(id))
}

/// List the caller's service orders
/// GET /service_orders
pub async fn list_service_orders(
    req: HttpRequest,
    service: web::Data<Arc<ServiceOrderService>>,
    principal: Principal,
    query: web::Query<ListServiceOrdersQuery>,
) -> Result<HttpResponse, AppError> {
    let page = service
        .list(&principal, query.limit, query.offset)
        .await?;

    let hrefs = hrefs(&req);
    let expand = query.expands_resources();
    let resources: Vec<CollectionMember> = page
        .orders
        .into_iter()
        .map(|order| {
            if expand {
                CollectionMember::Expanded(ServiceOrderResponse::from_order(order, &hrefs))
            } else {
                CollectionMember::Reference {
                    href: hrefs.resource(order.id),
                }
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(CollectionResponse {
        name: COLLECTION_NAME,
        count: page.count,
        subcount: resources.len() as i64,
        resources,
    }))
}

/// Create, edit or delete through the collection
/// POST /service_orders
pub async fn post_collection(
    req: HttpRequest,
    service: web::Data<Arc<ServiceOrderService>>,
    principal: Principal,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let hrefs = hrefs(&req);

    let results = match CollectionAction::from_body(body.into_inner())? {
        CollectionAction::Create {
            resource: Some(order),
            resources,
        } if resources.is_empty() => {
            let created = service.create(&principal, order).await?;
            vec![render(created, &hrefs)]
        }
        CollectionAction::Create { resource, resources } => {
            let orders = resource.into_iter().chain(resources).collect();
            service
                .create_many(&principal, orders)
                .await?
                .into_iter()
                .map(|result| match result {
                    Ok(order) => render(order, &hrefs),
                    Err(e) => ResultEntry::Action(ActionResult::failure(&e, None)),
                })
                .collect()
        }
        CollectionAction::Edit { resources } => {
            let references: Vec<_> = resources.iter().map(|r| r.reference()).collect();
            service
                .update_many(&principal, resources)
                .await?
                .into_iter()
                .zip(&references)
                .map(|(result, reference)| match result {
                    Ok(order) => render(order, &hrefs),
                    Err(e) => ResultEntry::Action(ActionResult::failure(
                        &e,
                        reference_href(reference, &hrefs),
                    )),
                })
                .collect()
        }
        CollectionAction::Delete { resources } => {
            let references = resources.clone();
            service
                .delete_many(&principal, resources)
                .await?
                .into_iter()
                .zip(&references)
                .map(|(result, reference)| {
                    ResultEntry::Action(match result {
                        Ok(id) => ActionResult::deleted(id, &hrefs),
                        Err(e) => ActionResult::failure(&e, reference_href(reference, &hrefs)),
                    })
                })
                .collect()
        }
    };

    Ok(HttpResponse::Ok().json(ResultsResponse { results }))
}

/// Get a service order by id, or the caller's cart
/// GET /service_orders/{id}
pub async fn get_service_order(
    req: HttpRequest,
    service: web::Data<Arc<ServiceOrderService>>,
    principal: Principal,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = service.get(&principal, &path).await?;

    Ok(HttpResponse::Ok().json(ServiceOrderResponse::from_order(order, &hrefs(&req))))
}

/// Edit or delete a single service order
/// POST /service_orders/{id}
pub async fn post_resource(
    req: HttpRequest,
    service: web::Data<Arc<ServiceOrderService>>,
    principal: Principal,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let hrefs = hrefs(&req);

    match ResourceAction::from_body(body.into_inner())? {
        ResourceAction::Edit { resource } => {
            let order = service.update(&principal, &path, resource).await?;
            Ok(HttpResponse::Ok().json(ServiceOrderResponse::from_order(order, &hrefs)))
        }
        ResourceAction::Delete => {
            let id = service.delete(&principal, &path).await?;
            Ok(HttpResponse::Ok().json(ActionResult::deleted(id, &hrefs)))
        }
    }
}

/// Delete a single service order
/// DELETE /service_orders/{id}
pub async fn delete_service_order(
    service: web::Data<Arc<ServiceOrderService>>,
    principal: Principal,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete(&principal, &path).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure service order routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/service_orders")
            .route("", web::get().to(list_service_orders))
            .route("", web::post().to(post_collection))
            .route("/{id}", web::get().to(get_service_order))
            .route("/{id}", web::post().to(post_resource))
            .route("/{id}", web::delete().to(delete_service_order)),
    );
}

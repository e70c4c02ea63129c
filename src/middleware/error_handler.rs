use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{JsonPayloadError, QueryPayloadError},
    Error, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use super::request_id::CorrelationId;
use crate::core::AppError;

/// Middleware logging failed requests
///
/// Handler errors are already turned into responses by the time they reach
/// this layer, so the error is read back from the response.
pub struct ErrorLogger;

impl<S, B> Transform<S, ServiceRequest> for ErrorLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorLoggerMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ErrorLoggerMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ErrorLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let result = service.call(req).await;

            match &result {
                Ok(res) => log_error(res),
                Err(err) => tracing::error!("Request error: {:?}", err),
            }

            result
        })
    }
}

/// Log the error attached to a response, if any
pub fn log_error<B>(res: &ServiceResponse<B>) {
    let Some(err) = res.response().error() else {
        return;
    };

    let status = res.status();
    let path = res.request().path();
    let request_id = res
        .request()
        .extensions()
        .get::<CorrelationId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    if status.is_server_error() {
        tracing::error!(status = %status, path = %path, request_id = %request_id, "Request failed: {}", err);
    } else {
        tracing::debug!(status = %status, path = %path, request_id = %request_id, "Request rejected: {}", err);
    }
}

/// Render malformed JSON bodies with the standard error envelope
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    AppError::validation(format!("Invalid request body: {}", err)).into()
}

/// Render malformed query strings with the standard error envelope
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    AppError::validation(format!("Invalid query parameters: {}", err)).into()
}

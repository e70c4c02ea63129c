use crate::core::AppError;
use crate::modules::authorization::IdentityRepository;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// API Key authentication middleware
///
/// Resolves the `X-API-Key` header to a [`Principal`](crate::modules::authorization::Principal)
/// and stores it in the request extensions for handlers to extract.
pub struct ApiKeyAuth {
    identities: Arc<dyn IdentityRepository>,
}

impl ApiKeyAuth {
    pub fn new(identities: Arc<dyn IdentityRepository>) -> Self {
        Self { identities }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
            identities: self.identities.clone(),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
    identities: Arc<dyn IdentityRepository>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let identities = self.identities.clone();

        Box::pin(async move {
            let api_key = req
                .headers()
                .get(API_KEY_HEADER)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);

            let resolved = match api_key {
                None => Err(AppError::unauthorized("Missing X-API-Key header")),
                Some(key) => match identities.find_by_api_key(&key).await {
                    Ok(Some(principal)) => Ok(principal),
                    Ok(None) => Err(AppError::unauthorized("Invalid API key")),
                    Err(e) => Err(e),
                },
            };

            match resolved {
                Ok(principal) => {
                    tracing::debug!(user_id = principal.user_id, "Authenticated request");
                    req.extensions_mut().insert(principal);
                    svc.call(req).await.map(|res| res.map_into_left_body())
                }
                Err(err) => {
                    tracing::debug!(path = %req.path(), "Rejected request: {}", err);
                    let http_response = err.error_response();
                    Ok(req.into_response(http_response).map_into_right_body())
                }
            }
        })
    }
}

/// Helper function to hash API keys using Argon2
pub fn hash_api_key(api_key: &str) -> crate::core::Result<String> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(api_key.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash API key: {}", e)))
}

/// Helper function to verify API keys using Argon2
pub fn verify_api_key(api_key: &str, hash: &str) -> crate::core::Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;

    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(api_key.as_bytes(), &parsed_hash)
        .is_ok())
}

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::auth::extractors::Principal;
use crate::auth::token::verify_token;
use crate::error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Authorization gate for protected scopes.
///
/// Requires `Authorization: Bearer <token>` with a valid, unexpired session
/// token. On success the token's subject is attached to the request as a
/// [`Principal`]; otherwise the request is answered with 401 and the wrapped
/// service is never called.
#[derive(Clone)]
pub struct AuthMiddleware {
    secret: Arc<[u8]>,
}

impl AuthMiddleware {
    pub fn new(secret: Arc<[u8]>) -> Self {
        Self { secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            secret: self.secret.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    secret: Arc<[u8]>,
}

/// Pulls the bearer token out of the request, or says why it could not.
fn bearer_token(req: &ServiceRequest) -> Result<&str, AppError> {
    let header = match req.headers().get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AppError::Unauthorized("missing token".into())),
    };

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| AppError::Unauthorized("bad scheme".into()))
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let principal = bearer_token(&req).and_then(|token| {
            verify_token(token, &self.secret)
                .map(|claims| Principal {
                    id: claims.subject_id,
                })
                .map_err(|e| {
                    log::debug!("rejected session token on {}: {}", req.path(), e);
                    AppError::from(e)
                })
        });

        match principal {
            Ok(principal) => {
                req.extensions_mut().insert(principal);
                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::error::AppError;

/// Bearer-token gate for the completion endpoints.
///
/// Open when no token is configured; otherwise every request must carry
/// `Authorization: Bearer <token>` and is rejected with 401 otherwise.
pub struct AuthMiddleware {
    token: Option<String>,
}

impl AuthMiddleware {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            token: self.token.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    token: Option<String>,
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authorized = match &self.token {
            None => true,
            Some(expected) => bearer_token(&req) == Some(expected.as_str()),
        };
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if !authorized {
                log::warn!("rejected unauthenticated request to {}", req.path());
                let (req, _) = req.into_parts();
                let response = AppError::Unauthorized.error_response().map_into_right_body();
                return Ok(ServiceResponse::new(req, response));
            }
            service.call(req).await.map(|res| res.map_into_left_body())
        })
    }
}

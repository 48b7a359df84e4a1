//! Bearer-token gate for protected scopes.
//!
//! Rejections are rendered here (not returned as `Err`) so the envelope is
//! built while the request's trace scope is still active.

use std::rc::Rc;
use std::time::SystemTime;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::infra::db::require_db;
use crate::services::auth;
use crate::state::app_state::AppState;

pub struct AccessGuard;

impl<S, B> Transform<S, ServiceRequest> for AccessGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGuardMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AccessGuardMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessGuardMiddleware<S>
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
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    debug!(path = %req.path(), code = %err.code(), "access denied");
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<CurrentUser, AppError> {
    // Header shape is checked before anything touches the token or the store.
    let token = bearer_token(req.headers().get(header::AUTHORIZATION))?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;
    let db = require_db(state)?;

    let user = auth::validate(db, &state.security, &token, SystemTime::now()).await?;
    Ok(CurrentUser::from(user))
}

/// `Authorization` must be exactly two space-separated parts; the second is
/// the credential. The scheme word itself is not inspected.
pub fn bearer_token(value: Option<&HeaderValue>) -> Result<String, AppError> {
    let raw = value
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::UnauthorizedMissingBearer)?;

    let parts: Vec<&str> = raw.split(' ').collect();
    match parts.as_slice() {
        [_, token] if !token.is_empty() => Ok((*token).to_string()),
        _ => Err(AppError::UnauthorizedMissingBearer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<String, AppError> {
        bearer_token(Some(&HeaderValue::from_str(raw).unwrap()))
    }

    #[test]
    fn accepts_two_part_header() {
        assert_eq!(parse("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(matches!(
            bearer_token(None),
            Err(AppError::UnauthorizedMissingBearer)
        ));
    }

    #[test]
    fn wrong_part_count_is_rejected() {
        for raw in ["Bearer", "abc.def.ghi", "Bearer a b", "Bearer  abc", "Bearer "] {
            assert!(
                matches!(parse(raw), Err(AppError::UnauthorizedMissingBearer)),
                "{raw:?} should be rejected"
            );
        }
    }
}

//! Request handling of [`super::AuthMiddleware`].

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::core::{AppContext, AppError};
use crate::domain::models::auth::{AuthMode, AuthenticatedUser, RequiredRole};

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let auth_result = authenticate(&req);

            match (&mode, auth_result) {
                (AuthMode::Required, Err(err)) => {
                    log::warn!("Rejected {} {}: {}", req.method(), req.path(), err);
                    return Ok(reject(req, err));
                }
                (AuthMode::Required, Ok(user)) => {
                    if let Some(ref required) = required_role {
                        if !required.is_satisfied(&user.roles) {
                            log::warn!(
                                "{} lacks {:?} for {} {}",
                                user.username,
                                required,
                                req.method(),
                                req.path()
                            );
                            let err = AppError::AuthorizationError("Access is denied".to_string());
                            return Ok(reject(req, err));
                        }
                    }

                    log::debug!("Authenticated {}", user.username);
                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Ok(user)) => {
                    if required_role.as_ref().is_none_or(|r| r.is_satisfied(&user.roles)) {
                        req.extensions_mut().insert(user);
                    }
                }
                (AuthMode::Optional, Err(_)) => {}
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, err.error_response()).map_into_right_body()
}

/// Verifies the bearer token of the request with the context's token service.
fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let context = req
        .app_data::<web::Data<AppContext>>()
        .ok_or_else(|| AppError::InternalError("Application context is not configured".to_string()))?;
    let token_service = &context.token_service;

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Full authentication is required".to_string()))?;

    let token = token_service.extract_bearer_token(auth_header)?;
    let claims = token_service.verify_token(token)?;

    Ok(AuthenticatedUser::from(claims))
}

use actix_session::SessionExt;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::{
    utils::{redirect, Identity},
    LOGIN_URL,
};

/// Sends visitors without a session to the login page before they reach a
/// page that needs one.
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddleware { service }))
    }
}

pub struct AuthenticationMiddleware<S> {
    service: S,
}

/// Whether `method` on `path` changes state and so needs a signed in user.
pub fn requires_login(method: &Method, path: &str) -> bool {
    let segments = path.trim_matches('/').split('/').collect::<Vec<_>>();

    match segments.as_slice() {
        ["room", "new"] | ["profile", "edit"] => true,
        ["room", _, "edit" | "delete"] | ["message", _, "delete"] => true,
        ["room", _] => *method == Method::POST,
        _ => false,
    }
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let signed_in = Identity::from_session(&req.get_session()).is_some();

        if !signed_in && requires_login(req.method(), req.path()) {
            log::debug!("{} {} needs a session", req.method(), req.path());

            Box::pin(async move {
                let request = req.into_parts().0;
                let response = redirect(LOGIN_URL).map_into_right_body();

                Ok(ServiceResponse::new(request, response))
            })
        } else {
            let fut = self.service.call(req);
            Box::pin(async move {
                let res: ServiceResponse<B> = fut.await?;
                Ok(res.map_into_left_body())
            })
        }
    }
}

//! Authorization gate for session-protected routes.
//!
//! [`RequireLogin`] wraps a scope and short-circuits with `403 Forbidden`
//! unless the session carries a valid username. On success the username is
//! placed in the request extensions, where handlers pick it up through the
//! [`AuthenticatedUser`] extractor.
//!
//! ```text
//! web::scope("").wrap(RequireLogin).service(whoami)
//! ```

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{Error, Username};
use crate::inbound::http::session::{LOGIN_REQUIRED_MESSAGE, SessionContext};

/// Middleware factory rejecting requests without a logged-in session.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use cities_backend::inbound::http::auth_gate::RequireLogin;
///
/// let app = App::new().service(web::scope("/private").wrap(RequireLogin));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RequireLogin;

impl<S, B> Transform<S, ServiceRequest> for RequireLogin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>
        + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireLoginMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireLoginMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`RequireLogin`].
pub struct RequireLoginMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireLoginMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>
        + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let session = SessionContext::new(req.get_session());
            match session.require_username() {
                Ok(username) => {
                    req.extensions_mut().insert(username);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(error) => {
                    debug!(path = req.path(), "rejecting request without login");
                    let (request, _payload) = req.into_parts();
                    let response = HttpResponse::from_error(error).map_into_right_body();
                    Ok(ServiceResponse::new(request, response))
                }
            }
        })
    }
}

/// Identity established by [`RequireLogin`].
///
/// Extraction fails with `403 Forbidden` when no identity is present, so a
/// handler taking this argument never runs for an anonymous caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Username);

impl AuthenticatedUser {
    /// Name bound to the session at login.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.0
    }

    /// Take the username out of the wrapper.
    #[must_use]
    pub fn into_inner(self) -> Username {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let username = req.extensions().get::<Username>().cloned();
        ready(username.map(Self).ok_or_else(|| Error::forbidden(LOGIN_REQUIRED_MESSAGE)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use rstest::rstest;
    use serde_json::Value;

    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    async fn echo(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.into_inner().to_string())
    }

    async fn log_in_as(session: SessionContext) -> Result<HttpResponse, Error> {
        session.persist_username(&Username::new("alice").expect("valid username"))?;
        Ok(HttpResponse::Ok().finish())
    }

    #[rstest]
    #[actix_web::test]
    async fn rejects_anonymous_requests() {
        let app = test::init_service(
            App::new().wrap(test_session_middleware()).service(
                web::scope("/private")
                    .wrap(RequireLogin)
                    .route("/echo", web::get().to(echo)),
            ),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/private/echo").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("message").and_then(Value::as_str), Some("please login"));
        assert_eq!(body.get("code").and_then(Value::as_str), Some("forbidden"));
    }

    #[rstest]
    #[actix_web::test]
    async fn passes_username_to_handler_after_login() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/login", web::post().to(log_in_as))
                .service(
                    web::scope("/private")
                        .wrap(RequireLogin)
                        .route("/echo", web::get().to(echo)),
                ),
        )
        .await;

        let login = test::call_service(&app, test::TestRequest::post().uri("/login").to_request())
            .await;
        let cookie = session_cookie(&login).expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/private/echo")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "alice");
    }

    #[rstest]
    #[actix_web::test]
    async fn extractor_rejects_when_gate_is_absent() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/echo", web::get().to(echo)),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/echo").to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_session_cookie_is_forbidden() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/login", web::post().to(log_in_as))
                .service(
                    web::scope("/private")
                        .wrap(RequireLogin)
                        .route("/echo", web::get().to(echo)),
                ),
        )
        .await;
        let mut forged = actix_web::cookie::Cookie::new("session", "not-a-real-session");
        forged.set_path("/");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/private/echo")
                .cookie(forged)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}

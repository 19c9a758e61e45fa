//! Per-request trace identifiers.
//!
//! [`Trace`] names every request with a [`TraceId`]. A well-formed `trace-id`
//! header from the caller is kept, so a proxy can correlate its own logs;
//! otherwise a fresh UUID is minted. The id is scoped task-locally for the
//! handler, recorded on a `request` span and echoed in the response header.

use std::rc::Rc;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, info_span, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware assigning a [`TraceId`] to each request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use cities_backend::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: Rc<S>,
}

fn inbound_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(TraceId::from_header)
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = inbound_trace_id(&req).unwrap_or_else(TraceId::generate);
        let span = info_span!(
            "request",
            %trace_id,
            method = %req.method(),
            path = %req.path(),
        );
        let service = Rc::clone(&self.service);

        Box::pin(
            TraceId::scope(trace_id, async move {
                let mut res = service.call(req).await?;
                match HeaderValue::from_str(&trace_id.to_string()) {
                    Ok(value) => {
                        res.headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(error) => warn!(%error, "trace id is not a valid header value"),
                }
                Ok(res)
            })
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error as DomainError;
    use crate::inbound::http::ApiResult;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    const CALLER_ID: &str = "0b6f8c1e-4d1e-4b7e-9a51-2f3c9d7e6a11";

    async fn current_id() -> HttpResponse {
        let id = TraceId::current().map(|id| id.to_string()).unwrap_or_default();
        HttpResponse::Ok().body(id)
    }

    async fn refuse() -> ApiResult<HttpResponse> {
        Err(DomainError::forbidden("please login"))
    }

    async fn call(path: &str, inbound: Option<&str>) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/id", web::get().to(current_id))
                .route("/refuse", web::get().to(refuse)),
        )
        .await;
        let mut req = test::TestRequest::get().uri(path);
        if let Some(value) = inbound {
            req = req.insert_header((TRACE_ID_HEADER, value));
        }
        test::call_service(&app, req.to_request()).await
    }

    fn header(res: &ServiceResponse) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn handler_sees_the_id_echoed_in_the_header() {
        let res = call("/id", None).await;
        let echoed = header(&res);
        let body = test::read_body(res).await;

        assert!(echoed.parse::<TraceId>().is_ok());
        assert_eq!(body, echoed.as_bytes());
    }

    #[rstest]
    #[case(Some(CALLER_ID), true)]
    #[case(Some("not-a-uuid"), false)]
    #[case(None, false)]
    #[actix_web::test]
    async fn caller_ids_are_kept_only_when_well_formed(
        #[case] inbound: Option<&str>,
        #[case] kept: bool,
    ) {
        let res = call("/id", inbound).await;
        assert_eq!(header(&res) == CALLER_ID, kept);
    }

    #[rstest]
    #[actix_web::test]
    async fn error_bodies_carry_the_request_id() {
        let res = call("/refuse", Some(CALLER_ID)).await;
        assert_eq!(header(&res), CALLER_ID);

        let body: DomainError = test::read_body_json(res).await;
        assert_eq!(body.trace_id(), Some(CALLER_ID));
    }
}

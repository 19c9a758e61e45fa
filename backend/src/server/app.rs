//! Application factory shared by the server and end-to-end tests.

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::SessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use cities_backend::Trace;
use cities_backend::inbound::http::auth_gate::RequireLogin;
use cities_backend::inbound::http::cities::get_city;
use cities_backend::inbound::http::error::json_config;
use cities_backend::inbound::http::state::HttpState;
use cities_backend::inbound::http::users::{login, signup, whoami};

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Everything the per-worker application needs.
#[derive(Clone)]
pub struct AppDependencies<S> {
    pub http_state: web::Data<HttpState>,
    pub session_store: S,
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
    pub session_ttl: CookieDuration,
}

/// Assemble routes, session handling and tracing.
///
/// `POST /signup` and `POST /login` are public. Every other path sits behind
/// [`RequireLogin`], so anonymous callers get `403` even for unknown routes.
pub fn build_app<S>(
    deps: AppDependencies<S>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: SessionStore + 'static,
{
    let AppDependencies {
        http_state,
        session_store,
        key,
        cookie_secure,
        same_site,
        session_ttl,
    } = deps;

    let session = SessionMiddleware::builder(session_store, key)
        .cookie_name(SESSION_COOKIE_NAME.into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
        .build();

    let app = App::new()
        .app_data(http_state)
        .app_data(json_config())
        .wrap(session)
        .wrap(Trace)
        .service(signup)
        .service(login);

    #[cfg(debug_assertions)]
    let app = {
        use cities_backend::ApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    };

    app.service(
        web::scope("")
            .wrap(RequireLogin)
            .service(whoami)
            .service(get_city),
    )
}

//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use mockable::DefaultClock;

use crate::outbound::session::RepositorySessionStore;
use crate::test_support::InMemorySessionRepository;

/// Cookie name used by the test middleware.
pub const TEST_SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh encryption key per invocation.
/// - Keeps state in a private in-memory session repository.
/// - Disables the `Secure` flag for local HTTP tests.
pub fn test_session_middleware()
-> SessionMiddleware<RepositorySessionStore<InMemorySessionRepository>> {
    let store = RepositorySessionStore::new(
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(DefaultClock),
    );
    SessionMiddleware::builder(store, Key::generate())
        .cookie_name(TEST_SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == TEST_SESSION_COOKIE)
        .map(Cookie::into_owned)
}
